//! Use-case services.
//!
//! # Responsibility
//! - Wrap record stores with notifications, debounced edits and re-rendering.
//! - Compose every component into page-level operations.

pub mod collection_service;
pub mod journal;
