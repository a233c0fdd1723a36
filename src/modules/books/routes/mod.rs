//! HTTP handlers for the books resource.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use bookshelf_db::RecordId;
use bookshelf_http::error::AppError;
use serde_json::Value;

use super::models::{Book, BookInput};
use super::service::{BookService, ServiceError};
use super::validation::validate_book;

const NOT_FOUND_ON_GET: &str = "Book could not be found.";
const NOT_FOUND: &str = "Book not found";

pub type SharedBookService = Arc<dyn BookService>;

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::internal(err)
    }
}

/// Routes relative to the module mount point.
pub fn router(service: SharedBookService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(service)
}

async fn list_books(State(service): State<SharedBookService>) -> Result<Json<Vec<Book>>, AppError> {
    let books = service.list_books().await?;
    Ok(Json(books))
}

async fn get_book(
    State(service): State<SharedBookService>,
    Path(raw_id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let id = parse_id(&raw_id)?;
    match service.get_book(id).await? {
        Some(book) => Ok(Json(book)),
        None => Err(AppError::not_found(NOT_FOUND_ON_GET)),
    }
}

async fn create_book(
    State(service): State<SharedBookService>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let input = book_input(payload)?;
    let book = service.create_book(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(service): State<SharedBookService>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let input = book_input(payload)?;
    let id = parse_id(&raw_id)?;
    match service.update_book(input, id).await? {
        Some(book) => Ok((StatusCode::CREATED, Json(book))),
        None => Err(AppError::not_found(NOT_FOUND)),
    }
}

async fn delete_book(
    State(service): State<SharedBookService>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&raw_id)?;
    if service.get_book(id).await?.is_none() {
        return Err(AppError::not_found(NOT_FOUND));
    }

    service.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<RecordId, AppError> {
    raw.parse()
        .map_err(|_| AppError::bad_request(format!("invalid book id '{raw}'")))
}

fn book_input(payload: Result<Json<Value>, JsonRejection>) -> Result<BookInput, AppError> {
    let Json(body) = payload?;
    validate_book(&body).map_err(|errors| {
        let details = errors
            .iter()
            .map(|error| serde_json::to_value(error).unwrap_or(Value::Null))
            .collect();
        AppError::validation(details, "invalid book payload")
    })
}
