pub mod models;
pub mod routes;
pub mod service;
pub mod validation;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use bookshelf_db::Database;
use bookshelf_kernel::{InitCtx, Module};

use routes::SharedBookService;
use service::{BookService, StoreBookService};

/// Store table holding book documents
pub const BOOK_TABLE: &str = "book";

/// CRUD module for the books resource
pub struct BooksModule {
    service: SharedBookService,
}

impl BooksModule {
    pub fn new(service: SharedBookService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if let Some(seed_path) = &ctx.settings.database.seed_path {
            ctx.db
                .seed_from_file(BOOK_TABLE, seed_path)
                .await
                .context("failed to seed books")?;

            // Surface malformed seed rows at startup rather than on the first request.
            let books = self
                .service
                .list_books()
                .await
                .context("seeded books are not valid")?;
            tracing::info!(module = self.name(), count = books.len(), "books seeded");
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.service))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books ordered by id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/Book"
                                            }
                                        }
                                    }
                                }
                            },
                            "500": {
                                "$ref": "#/components/responses/BookServiceError"
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/BookInput"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "$ref": "#/components/responses/BookBody"
                            },
                            "400": {
                                "$ref": "#/components/responses/BookBadRequest"
                            },
                            "500": {
                                "$ref": "#/components/responses/BookServiceError"
                            }
                        }
                    }
                },
                "/{id}": {
                    "parameters": [
                        {
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": {
                                "type": "integer",
                                "format": "int64"
                            }
                        }
                    ],
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "$ref": "#/components/responses/BookBody"
                            },
                            "400": {
                                "$ref": "#/components/responses/BookBadRequest"
                            },
                            "404": {
                                "$ref": "#/components/responses/BookNotFound"
                            },
                            "500": {
                                "$ref": "#/components/responses/BookServiceError"
                            }
                        }
                    },
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/BookInput"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "$ref": "#/components/responses/BookBody"
                            },
                            "400": {
                                "$ref": "#/components/responses/BookBadRequest"
                            },
                            "404": {
                                "$ref": "#/components/responses/BookNotFound"
                            },
                            "500": {
                                "$ref": "#/components/responses/BookServiceError"
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "204": {
                                "description": "Book deleted"
                            },
                            "400": {
                                "$ref": "#/components/responses/BookBadRequest"
                            },
                            "404": {
                                "$ref": "#/components/responses/BookNotFound"
                            },
                            "500": {
                                "$ref": "#/components/responses/BookServiceError"
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Identifier assigned on creation"
                            },
                            "title": {
                                "type": "string"
                            },
                            "authorId": {
                                "type": "integer",
                                "format": "int64"
                            },
                            "datePublished": {
                                "type": "string",
                                "format": "date"
                            },
                            "isFiction": {
                                "type": "boolean"
                            }
                        },
                        "required": ["id", "title", "authorId", "datePublished", "isFiction"]
                    },
                    "BookInput": {
                        "type": "object",
                        "properties": {
                            "title": {
                                "type": "string"
                            },
                            "authorId": {
                                "type": "integer",
                                "format": "int64"
                            },
                            "datePublished": {
                                "type": "string",
                                "description": "YYYY-MM-DD or YYYY/MM/DD"
                            },
                            "isFiction": {
                                "type": "boolean"
                            }
                        },
                        "required": ["title", "authorId", "datePublished", "isFiction"]
                    }
                },
                "responses": {
                    "BookBody": {
                        "description": "The book",
                        "content": {
                            "application/json": {
                                "schema": {
                                    "$ref": "#/components/schemas/Book"
                                }
                            }
                        }
                    },
                    "BookBadRequest": {
                        "description": "Invalid id or body",
                        "content": {
                            "application/json": {
                                "schema": {
                                    "oneOf": [
                                        { "$ref": "#/components/schemas/ValidationErrors" },
                                        { "$ref": "#/components/schemas/ErrorMessage" }
                                    ]
                                }
                            }
                        }
                    },
                    "BookNotFound": {
                        "description": "No book with this id",
                        "content": {
                            "application/json": {
                                "schema": {
                                    "$ref": "#/components/schemas/ErrorMessage"
                                }
                            }
                        }
                    },
                    "BookServiceError": {
                        "description": "Persistence failure",
                        "content": {
                            "application/json": {
                                "schema": {
                                    "$ref": "#/components/schemas/ErrorMessage"
                                }
                            }
                        }
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module backed by the `book` table of `db`
pub async fn create_module(db: &Database) -> Arc<dyn Module> {
    let table = db.table(BOOK_TABLE).await;
    Arc::new(BooksModule::new(Arc::new(StoreBookService::new(table))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_kernel::Settings;

    #[tokio::test]
    async fn init_seeds_books_from_settings() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("books.json");
        std::fs::write(
            &seed,
            serde_json::json!([
                {"title": "Dune", "authorId": 1, "datePublished": "1965-08-01", "isFiction": true},
                {"title": "Silent Spring", "authorId": 2, "datePublished": "1962-09-27", "isFiction": false}
            ])
            .to_string(),
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.database.seed_path = Some(seed);
        let db = Database::new();
        let module = create_module(&db).await;

        module
            .init(&InitCtx {
                settings: &settings,
                db: &db,
            })
            .await
            .unwrap();

        assert_eq!(db.table(BOOK_TABLE).await.len().await, 2);
    }

    #[tokio::test]
    async fn init_rejects_malformed_seed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("books.json");
        std::fs::write(&seed, r#"[{"title": "Dune"}]"#).unwrap();

        let mut settings = Settings::default();
        settings.database.seed_path = Some(seed);
        let db = Database::new();
        let module = create_module(&db).await;

        let err = module
            .init(&InitCtx {
                settings: &settings,
                db: &db,
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "seeded books are not valid");
    }

    #[tokio::test]
    async fn openapi_fragment_covers_every_operation() {
        let module = create_module(&Database::new()).await;
        let fragment = module.openapi().unwrap();

        for (path, method) in [
            ("/", "get"),
            ("/", "post"),
            ("/{id}", "get"),
            ("/{id}", "put"),
            ("/{id}", "delete"),
        ] {
            assert!(fragment["paths"][path][method].is_object(), "{method} {path}");
        }
        assert!(fragment["components"]["responses"]["BookNotFound"].is_object());
    }
}
