//! Error types for txtset
//!
//! Configuration errors are fatal and stop startup. API errors only cover
//! lookups of names that were never registered; resolution itself never
//! fails.

use std::collections::TryReserveError;
use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Config Error Enum ==
/// Errors raised while loading variable declarations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Variable name is missing the `$` sigil (or is only the sigil)
    #[error("invalid variable name \"{0}\"")]
    InvalidVariableName(String),

    /// Directive has the wrong number of arguments
    #[error("invalid number of arguments in \"{directive}\" directive on line {line}: expected 3 or 4, got {count}")]
    InvalidArgumentCount {
        directive: String,
        line: usize,
        count: usize,
    },

    /// Directive name is not recognized
    #[error("unknown directive \"{name}\" on line {line}")]
    UnknownDirective { name: String, line: usize },

    /// Malformed directive file
    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Registration failed for the directive starting on `line`
    #[error("{source} on line {line}")]
    Directive {
        line: usize,
        #[source]
        source: Box<ConfigError>,
    },

    /// Could not grow the variable table
    #[error("failed to allocate variable slot: {0}")]
    Allocation(#[from] TryReserveError),

    /// Directive file could not be read
    #[error("failed to read \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// == API Error Enum ==
/// Errors returned by the HTTP host.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Variable is not registered
    #[error("Variable not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
