//! Field checks for book request bodies.
//!
//! The body is inspected as raw JSON so that every failing field is reported,
//! not just the first one a typed deserializer would trip over.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::models::BookInput;

const INVALID_VALUE: &str = "Invalid value";

/// One rejected field of a request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub msg: &'static str,
    pub path: &'static str,
    pub location: &'static str,
}

impl FieldError {
    fn body(path: &'static str, value: Option<&Value>) -> Self {
        Self {
            kind: "field",
            value: value.cloned(),
            msg: INVALID_VALUE,
            path,
            location: "body",
        }
    }
}

/// Check a create/replace body and coerce it into a [`BookInput`].
pub fn validate_book(body: &Value) -> Result<BookInput, Vec<FieldError>> {
    let mut errors = Vec::new();

    let title = field(body, "title", &mut errors, |value| {
        value.as_str().map(str::to_owned)
    });
    let author_id = field(body, "authorId", &mut errors, parse_int);
    let date_published = field(body, "datePublished", &mut errors, parse_date);
    let is_fiction = field(body, "isFiction", &mut errors, parse_bool);

    match (title, author_id, date_published, is_fiction) {
        (Some(title), Some(author_id), Some(date_published), Some(is_fiction)) => Ok(BookInput {
            title,
            author_id,
            date_published,
            is_fiction,
        }),
        _ => Err(errors),
    }
}

fn field<T>(
    body: &Value,
    path: &'static str,
    errors: &mut Vec<FieldError>,
    parse: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let value = body.get(path);
    let parsed = value.and_then(parse);
    if parsed.is_none() {
        errors.push(FieldError::body(path, value));
    }
    parsed
}

fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| {
                    float.fract() == 0.0 && *float >= i64::MIN as f64 && *float < i64::MAX as f64
                })
                .map(|float| float as i64)
        }),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

/// Accepts exactly `YYYY-MM-DD` or `YYYY/MM/DD`, zero padded, one delimiter kind.
fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?;
    let bytes = text.as_bytes();
    if bytes.len() != 10 {
        return None;
    }

    let format = match (bytes[4], bytes[7]) {
        (b'-', b'-') => "%Y-%m-%d",
        (b'/', b'/') => "%Y/%m/%d",
        _ => return None,
    };
    let digits_in_place = bytes
        .iter()
        .enumerate()
        .all(|(index, byte)| index == 4 || index == 7 || byte.is_ascii_digit());
    if !digits_in_place {
        return None;
    }

    NaiveDate::parse_from_str(text, format).ok()
}

fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(number) => match number.as_u64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    }
}
