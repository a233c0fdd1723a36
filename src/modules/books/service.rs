use async_trait::async_trait;
use bookshelf_db::{DbError, RecordId, Table};
use thiserror::Error;

use super::models::{Book, BookInput};

/// Failure inside the book persistence layer. The message is shown to clients as is.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] DbError),

    #[error("stored book {id} is malformed: {source}")]
    Malformed {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode book: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Persistence operations the book routes delegate to.
///
/// A missing record is `Ok(None)`, never an error.
#[async_trait]
pub trait BookService: Send + Sync {
    async fn list_books(&self) -> ServiceResult<Vec<Book>>;

    async fn get_book(&self, id: RecordId) -> ServiceResult<Option<Book>>;

    async fn create_book(&self, data: BookInput) -> ServiceResult<Book>;

    async fn update_book(&self, data: BookInput, id: RecordId) -> ServiceResult<Option<Book>>;

    async fn delete_book(&self, id: RecordId) -> ServiceResult<()>;
}

/// [`BookService`] backed by a store table.
#[derive(Debug, Clone)]
pub struct StoreBookService {
    table: Table,
}

impl StoreBookService {
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    fn decode(document: serde_json::Value) -> ServiceResult<Book> {
        let id = document
            .get("id")
            .map(ToString::to_string)
            .unwrap_or_else(|| "<unknown>".to_string());
        serde_json::from_value(document).map_err(|source| ServiceError::Malformed { id, source })
    }

    fn encode(data: &BookInput) -> ServiceResult<serde_json::Value> {
        serde_json::to_value(data).map_err(ServiceError::Encode)
    }
}

#[async_trait]
impl BookService for StoreBookService {
    async fn list_books(&self) -> ServiceResult<Vec<Book>> {
        self.table
            .list()
            .await
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    async fn get_book(&self, id: RecordId) -> ServiceResult<Option<Book>> {
        self.table.get(id).await.map(Self::decode).transpose()
    }

    async fn create_book(&self, data: BookInput) -> ServiceResult<Book> {
        let stored = self.table.insert(Self::encode(&data)?).await?;
        let book = Self::decode(stored)?;
        tracing::info!(book_id = book.id, title = %book.title, "book created");
        Ok(book)
    }

    async fn update_book(&self, data: BookInput, id: RecordId) -> ServiceResult<Option<Book>> {
        let replaced = self.table.replace(id, Self::encode(&data)?).await?;
        if replaced.is_some() {
            tracing::info!(book_id = id, "book updated");
        }
        replaced.map(Self::decode).transpose()
    }

    async fn delete_book(&self, id: RecordId) -> ServiceResult<()> {
        if self.table.remove(id).await.is_some() {
            tracing::info!(book_id = id, "book deleted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_db::Database;
    use chrono::NaiveDate;
    use serde_json::json;

    fn dune() -> BookInput {
        BookInput {
            title: "Dune".to_string(),
            author_id: 1,
            date_published: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
            is_fiction: true,
        }
    }

    async fn service() -> (StoreBookService, Table) {
        let table = Database::new().table("book").await;
        (StoreBookService::new(table.clone()), table)
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (service, _) = service().await;

        let created = service.create_book(dune()).await.unwrap();
        let fetched = service.get_book(created.id).await.unwrap();

        assert_eq!(created, dune().with_id(1));
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn update_missing_book_is_none() {
        let (service, table) = service().await;

        let updated = service.update_book(dune(), 99).await.unwrap();

        assert!(updated.is_none());
        assert!(table.is_empty().await);
    }

    #[tokio::test]
    async fn delete_missing_book_is_ok() {
        let (service, _) = service().await;

        service.delete_book(5).await.unwrap();
    }

    #[tokio::test]
    async fn malformed_rows_surface_as_errors() {
        let (service, table) = service().await;
        table.insert(json!({"title": "no author"})).await.unwrap();

        let err = service.list_books().await.unwrap_err();

        assert!(matches!(err, ServiceError::Malformed { ref id, .. } if id == "1"));
        assert!(err.to_string().starts_with("stored book 1 is malformed"));
    }
}
