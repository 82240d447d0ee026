//! API module
//!
//! Contains HTTP request handlers for the file store endpoints

pub mod files;
pub mod health;
pub mod index;
