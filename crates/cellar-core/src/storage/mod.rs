//! Storage layer
//!
//! Handles persistence of the cellar store file.
//!
//! The whole registry is written as one JSON array on every accepted
//! command. In-memory state stays authoritative: a failed write is reported
//! to the caller, which decides whether to surface or swallow it.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::JsonPersistence;
