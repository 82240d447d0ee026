// Application state
// Carries the configured CSV store shared across request handlers

use crate::services::CsvStore;

/// Shared application state
///
/// The store is the only shared resource; it is immutable after startup, so
/// no lock is needed around it.
#[derive(Debug, Clone)]
pub struct AppState {
    store: CsvStore,
}

impl AppState {
    /// Create application state around a configured store
    pub fn new(store: CsvStore) -> Self {
        Self { store }
    }

    /// The CSV store backing all file operations
    pub fn store(&self) -> &CsvStore {
        &self.store
    }
}
