//! Merges module OpenAPI fragments into one document.

use serde_json::{json, Value};

use bookshelf_kernel::ModuleRegistry;

pub const TITLE: &str = "Bookshelf API";
pub const VERSION: &str = "1.0.0";

/// Build the merged OpenAPI document for every registered module.
///
/// Module paths are prefixed with `/api/{module_name}`. Module components
/// (schemas, responses, ...) are merged by kind, later modules overwriting
/// earlier ones.
pub fn document(registry: &ModuleRegistry) -> Value {
    let mut spec = json!({
        "openapi": "3.0.0",
        "info": {
            "title": TITLE,
            "version": VERSION,
            "description": "Books resource service"
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    spec["components"]["schemas"]["ErrorMessage"] = json!({
        "type": "string",
        "description": "Human readable error message"
    });

    spec["components"]["schemas"]["ValidationErrors"] = json!({
        "type": "object",
        "properties": {
            "errors": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "type": { "type": "string" },
                        "value": {},
                        "msg": { "type": "string" },
                        "path": { "type": "string" },
                        "location": { "type": "string" }
                    },
                    "required": ["type", "msg", "path", "location"]
                }
            }
        },
        "required": ["errors"]
    });

    spec["paths"]["/healthz"] = json!({
        "get": {
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": {
                        "text/plain": {
                            "schema": {
                                "type": "string"
                            }
                        }
                    }
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths) = module_spec.get("paths").and_then(Value::as_object) {
            for (path, path_item) in paths {
                let prefixed = if path == "/" {
                    format!("/api/{}", module.name())
                } else {
                    format!("/api/{}{}", module.name(), path)
                };
                spec["paths"][prefixed] = path_item.clone();
            }
        }

        if let Some(components) = module_spec.get("components").and_then(Value::as_object) {
            for (kind, entries) in components {
                let Some(entries) = entries.as_object() else {
                    continue;
                };
                for (name, entry) in entries {
                    spec["components"][kind][name] = entry.clone();
                }
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bookshelf_kernel::Module;
    use std::sync::Arc;

    struct ShelvesModule;

    #[async_trait]
    impl Module for ShelvesModule {
        fn name(&self) -> &'static str {
            "shelves"
        }

        fn openapi(&self) -> Option<Value> {
            Some(json!({
                "paths": {
                    "/": { "get": { "summary": "List shelves" } },
                    "/{id}": { "get": { "summary": "Get shelf" } }
                },
                "components": {
                    "schemas": { "Shelf": { "type": "object" } },
                    "responses": { "ShelfNotFound": { "description": "missing" } }
                }
            }))
        }
    }

    #[test]
    fn module_paths_are_prefixed() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(ShelvesModule)).unwrap();

        let spec = document(&registry);

        assert_eq!(spec["paths"]["/api/shelves"]["get"]["summary"], "List shelves");
        assert_eq!(spec["paths"]["/api/shelves/{id}"]["get"]["summary"], "Get shelf");
        assert!(spec["components"]["schemas"]["Shelf"].is_object());
        assert!(spec["components"]["schemas"]["ErrorMessage"].is_object());
        assert_eq!(
            spec["components"]["responses"]["ShelfNotFound"]["description"],
            "missing"
        );
    }
}
