pub mod books;

use bookshelf_db::Database;
use bookshelf_kernel::ModuleRegistry;

/// Register every application module with the registry
pub async fn register_all(registry: &mut ModuleRegistry, db: &Database) -> anyhow::Result<()> {
    registry.register(books::create_module(db).await)?;
    Ok(())
}
