// State management module
// Holds the shared application state handed to the router

pub mod app_state;

pub use app_state::AppState;
