//! Auto-incrementing table of JSON documents.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::{DbError, RecordId};

/// Field every stored document carries its identifier in.
pub const ID_FIELD: &str = "id";

#[derive(Debug)]
struct TableState {
    next_id: RecordId,
    rows: BTreeMap<RecordId, Map<String, Value>>,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

/// Handle to a named table. Clones share the same rows.
///
/// Ids start at 1 and are never reused, even after the row holding the
/// highest id is removed. Any `id` field on an incoming document is replaced
/// by the identifier the table assigns.
#[derive(Debug, Clone)]
pub struct Table {
    name: Arc<str>,
    state: Arc<RwLock<TableState>>,
}

impl Table {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            state: Arc::new(RwLock::new(TableState::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All documents in ascending id order.
    pub async fn list(&self) -> Vec<Value> {
        let state = self.state.read().await;
        state
            .rows
            .iter()
            .map(|(id, row)| with_id(*id, row.clone()))
            .collect()
    }

    pub async fn get(&self, id: RecordId) -> Option<Value> {
        let state = self.state.read().await;
        state.rows.get(&id).map(|row| with_id(id, row.clone()))
    }

    /// Store a new document and return it with its assigned id.
    pub async fn insert(&self, document: Value) -> Result<Value, DbError> {
        let row = self.to_row(document)?;

        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;
        state.rows.insert(id, row.clone());

        tracing::debug!(table = %self.name, id, "record inserted");
        Ok(with_id(id, row))
    }

    /// Replace the document stored under `id`. Returns `None` when no such row exists.
    pub async fn replace(&self, id: RecordId, document: Value) -> Result<Option<Value>, DbError> {
        let row = self.to_row(document)?;

        let mut state = self.state.write().await;
        match state.rows.get_mut(&id) {
            Some(existing) => {
                *existing = row.clone();
                tracing::debug!(table = %self.name, id, "record replaced");
                Ok(Some(with_id(id, row)))
            }
            None => Ok(None),
        }
    }

    /// Remove the document stored under `id`, returning it if it existed.
    pub async fn remove(&self, id: RecordId) -> Option<Value> {
        let mut state = self.state.write().await;
        let removed = state.rows.remove(&id).map(|row| with_id(id, row));
        if removed.is_some() {
            tracing::debug!(table = %self.name, id, "record removed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn to_row(&self, document: Value) -> Result<Map<String, Value>, DbError> {
        match document {
            Value::Object(mut row) => {
                row.remove(ID_FIELD);
                Ok(row)
            }
            _ => Err(DbError::NotAnObject {
                table: self.name().to_string(),
            }),
        }
    }
}

fn with_id(id: RecordId, mut row: Map<String, Value>) -> Value {
    row.insert(ID_FIELD.to_string(), Value::from(id));
    Value::Object(row)
}
