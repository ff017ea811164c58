//! Record store layer.
//!
//! # Responsibility
//! - Keep one typed collection in memory and mirror it to the key-value store.
//! - Debounce free-text edits per field before persisting them.
//! - Persist single-value raw text fields.
//!
//! # Invariants
//! - Every mutation re-serializes the whole collection under one key.
//! - A failed write rolls the in-memory collection back to its previous state.
//! - Sample data is seeded at most once per key.

pub mod debounce;
pub mod record_store;
pub mod text_field;

use crate::model::{RecordId, ValidationError};
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store error for persistence, lookup and validation failures.
#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
    Validation(ValidationError),
    NotFound(RecordId),
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Serialize(err) => write!(f, "failed to serialize collection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// User confirmation step guarding destructive actions.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}
