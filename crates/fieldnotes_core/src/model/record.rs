//! Shared record contracts.
//!
//! # Responsibility
//! - Bind each record type to its storage key.
//! - Express presence checks and explicit field edits without DOM scraping.
//!
//! # Invariants
//! - `validate()` only checks presence of required inputs.
//! - `apply_edit` never changes `id`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record identity: epoch milliseconds at creation time.
pub type RecordId = i64;

/// Presence/edit failure for user-provided record input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is empty after trimming.
    MissingField {
        collection: &'static str,
        field: &'static str,
    },
    /// Field name is not editable on this record type.
    UnknownField {
        collection: &'static str,
        field: String,
    },
    /// Field value cannot be interpreted (e.g. non-numeric score).
    InvalidValue { field: &'static str, value: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { collection, field } => {
                write!(f, "{collection}: `{field}` is required")
            }
            Self::UnknownField { collection, field } => {
                write!(f, "{collection}: `{field}` is not an editable field")
            }
            Self::InvalidValue { field, value } => {
                write!(f, "invalid value `{value}` for `{field}`")
            }
        }
    }
}

impl Error for ValidationError {}

/// A flat record persisted as one element of a named collection.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Storage key holding the whole serialized collection.
    const COLLECTION_KEY: &'static str;

    fn id(&self) -> RecordId;
    fn set_id(&mut self, id: RecordId);

    /// Short human label used in notifications and logs.
    fn label(&self) -> &str;

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Records with free-text regions edited in place.
pub trait EditableRecord: Record {
    /// Replaces one field with the value carried by an edit event.
    fn apply_edit(&mut self, field: &str, value: &str) -> Result<(), ValidationError>;
}

/// Records that support the temporary filtered view.
pub trait Searchable {
    /// Case-insensitive match of an already lowercased, trimmed query.
    fn matches(&self, query: &str) -> bool;
}

pub(crate) fn require(
    collection: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { collection, field });
    }
    Ok(())
}

pub(crate) fn unknown_field(collection: &'static str, field: &str) -> ValidationError {
    ValidationError::UnknownField {
        collection,
        field: field.to_string(),
    }
}

pub(crate) fn parse_score(field: &'static str, value: &str) -> Result<u8, ValidationError> {
    value
        .trim()
        .parse::<u8>()
        .map_err(|_| ValidationError::InvalidValue {
            field,
            value: value.to_string(),
        })
}

pub(crate) fn contains_folded(haystack: &str, query: &str) -> bool {
    haystack.to_lowercase().contains(query)
}
