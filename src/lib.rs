//! Bookshelf application library
//!
//! Wires the application modules into the kernel registry and runs them
//! behind the HTTP facade.

use anyhow::Context;
use bookshelf_db::Database;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod modules;

/// Build a registry holding every application module, backed by `db`
pub async fn build_registry(db: &Database) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, db).await?;
    Ok(registry)
}

/// Initialize and start all modules, serve HTTP until shutdown, then stop them
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let db = Database::new();
    let registry = build_registry(&db)
        .await
        .context("failed to register modules")?;

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!(modules = registry.len(), "bookshelf bootstrap complete");

    let served = bookshelf_http::start_server(&registry, &settings).await;
    let stopped = registry.stop_modules().await;

    served?;
    stopped
}
