//! Response models for the txtset host API
//!
//! This module defines the DTOs (Data Transfer Objects) serialized into
//! HTTP response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{
    ErrorResponse, HealthResponse, StatsResponse, VariableResponse, VariableStatsResponse,
    VariablesResponse,
};
