//! txtset - file-backed request variables
//!
//! Resolves named values from small text files, caching each for a TTL and
//! falling back to a configured default when the file is missing or holds
//! anything outside `[0-9A-Za-z_-]`.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod directive;
pub mod error;
pub mod models;
pub mod registry;

pub use api::AppState;
pub use config::Config;
pub use registry::Registry;
