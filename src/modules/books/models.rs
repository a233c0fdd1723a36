use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bookshelf_db::RecordId;

/// A stored book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Assigned by the store on creation
    pub id: RecordId,
    pub title: String,
    /// Reference to the book's author
    pub author_id: i64,
    pub date_published: NaiveDate,
    pub is_fiction: bool,
}

/// The four client-writable fields of a book, used for both create and full replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: String,
    pub author_id: i64,
    pub date_published: NaiveDate,
    pub is_fiction: bool,
}

impl BookInput {
    pub fn with_id(self, id: RecordId) -> Book {
        Book {
            id,
            title: self.title,
            author_id: self.author_id,
            date_published: self.date_published,
            is_fiction: self.is_fiction,
        }
    }
}
