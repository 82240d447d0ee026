//! Service layer
//!
//! Business logic that sits between the HTTP handlers and the filesystem.

pub mod store;

pub use store::{CsvStore, SavedFile};
