//! Record identifiers
//!
//! The mobile client keeps `userId` in string storage, so ids arrive either as
//! JSON numbers or as numeric strings. Both are accepted; anything that is not a
//! positive integer is a validation error.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Validated identifier of a stored row (always > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Parse an identifier from text (path segments, query strings).
    ///
    /// # Example
    /// ```
    /// use bookshelf_server::models::RecordId;
    ///
    /// assert_eq!(RecordId::parse("bookId", "42").unwrap().get(), 42);
    /// assert!(RecordId::parse("bookId", "0").is_err());
    /// assert!(RecordId::parse("bookId", "abc").is_err());
    /// ```
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::Missing { field });
        }

        raw.parse::<i64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ValidationError::InvalidId {
                field,
                value: raw.to_owned(),
            })
    }

    /// Wrap a raw row id; `None` for zero or negative values.
    pub fn new(value: i64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier as sent in a JSON body, before validation
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Number(i64),
    Text(String),
}

impl IdInput {
    pub fn into_record_id(self, field: &'static str) -> Result<RecordId, ValidationError> {
        match self {
            Self::Number(n) => RecordId::new(n).ok_or_else(|| ValidationError::InvalidId {
                field,
                value: n.to_string(),
            }),
            Self::Text(s) => RecordId::parse(field, &s),
        }
    }
}

/// Drop empty strings so they count as missing.
pub fn non_blank(value: Option<IdInput>) -> Option<IdInput> {
    value.filter(|v| !matches!(v, IdInput::Text(s) if s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        id: Option<IdInput>,
    }

    fn id_from(json: &str) -> Result<RecordId, ValidationError> {
        let body: Body = serde_json::from_str(json).unwrap();
        non_blank(body.id)
            .ok_or(ValidationError::Missing { field: "id" })?
            .into_record_id("id")
    }

    #[test]
    fn blank_text_is_dropped() {
        assert!(non_blank(Some(IdInput::Text(String::new()))).is_none());
        assert!(non_blank(Some(IdInput::Text("4".into()))).is_some());
        assert!(non_blank(Some(IdInput::Number(0))).is_some());
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(id_from(r#"{"id": 7}"#).unwrap().get(), 7);
        assert_eq!(id_from(r#"{"id": "7"}"#).unwrap().get(), 7);
    }

    #[test]
    fn missing_and_null_are_missing() {
        assert_eq!(
            id_from(r#"{}"#).unwrap_err(),
            ValidationError::Missing { field: "id" }
        );
        assert_eq!(
            id_from(r#"{"id": null}"#).unwrap_err(),
            ValidationError::Missing { field: "id" }
        );
        assert_eq!(
            id_from(r#"{"id": ""}"#).unwrap_err(),
            ValidationError::Missing { field: "id" }
        );
    }

    #[test]
    fn rejects_non_positive_and_garbage() {
        assert!(matches!(
            id_from(r#"{"id": 0}"#).unwrap_err(),
            ValidationError::InvalidId { .. }
        ));
        assert!(matches!(
            id_from(r#"{"id": "-3"}"#).unwrap_err(),
            ValidationError::InvalidId { .. }
        ));
        assert!(matches!(
            id_from(r#"{"id": "seven"}"#).unwrap_err(),
            ValidationError::InvalidId { .. }
        ));
    }

    #[test]
    fn serializes_as_plain_number() {
        let id = RecordId::new(12).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "12");
    }
}
