//! In-memory document store used as the bookshelf persistence layer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

pub mod table;

pub use table::Table;

/// Identifier assigned to every stored record.
pub type RecordId = i64;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("table '{table}' only stores JSON objects")]
    NotAnObject { table: String },

    #[error("failed to read seed file {path}")]
    SeedIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("seed file {path} is not valid JSON")]
    SeedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("seed file {path} must contain a JSON array")]
    SeedShape { path: PathBuf },
}

/// Shared handle to every table in the store.
#[derive(Debug, Clone, Default)]
pub struct Database {
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the named table, creating it on first use.
    pub async fn table(&self, name: &str) -> Table {
        if let Some(table) = self.tables.read().await.get(name) {
            return table.clone();
        }

        let mut tables = self.tables.write().await;
        tables
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::info!(target: "bookshelf-db", table = name, "table created");
                Table::new(name)
            })
            .clone()
    }

    /// Insert every document of the JSON array stored at `path` into `table`.
    ///
    /// Ids present in the file are discarded. Returns the number of records loaded.
    pub async fn seed_from_file(&self, table: &str, path: &Path) -> Result<usize, DbError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DbError::SeedIo {
                path: path.to_path_buf(),
                source,
            })?;

        let parsed: Value = serde_json::from_str(&raw).map_err(|source| DbError::SeedJson {
            path: path.to_path_buf(),
            source,
        })?;

        let Value::Array(documents) = parsed else {
            return Err(DbError::SeedShape {
                path: path.to_path_buf(),
            });
        };

        let target = self.table(table).await;
        let count = documents.len();
        for document in documents {
            target.insert(document).await?;
        }

        tracing::info!(
            target: "bookshelf-db",
            table,
            count,
            path = %path.display(),
            "table seeded"
        );
        Ok(count)
    }
}
