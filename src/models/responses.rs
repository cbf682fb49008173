//! Response DTOs for the txtset host API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{ResolveStats, ValueSource};
use crate::registry::{Resolved, VariableSnapshot};

/// Response body for a single variable (GET /var/:name)
#[derive(Debug, Clone, Serialize)]
pub struct VariableResponse {
    /// Variable name, without the sigil
    pub name: String,
    /// Resolved value
    pub value: String,
    /// Value length in bytes
    pub len: usize,
    /// Where the value came from
    pub source: ValueSource,
}

impl VariableResponse {
    /// Creates a new VariableResponse from a resolution
    pub fn new(name: impl Into<String>, resolved: Resolved) -> Self {
        Self {
            name: name.into(),
            value: resolved.value,
            len: resolved.meta.len,
            source: resolved.meta.source,
        }
    }
}

/// Response body for every variable at once (GET /vars)
#[derive(Debug, Clone, Serialize)]
pub struct VariablesResponse {
    pub variables: Vec<VariableResponse>,
}

/// Per-variable section of the stats response
#[derive(Debug, Clone, Serialize)]
pub struct VariableStatsResponse {
    pub name: String,
    pub ttl_seconds: u32,
    /// Unix seconds of the last refresh, 0 if never refreshed
    pub cached_at: i64,
    pub hits: u64,
    pub refreshes: u64,
    pub fallbacks: u64,
}

impl From<VariableSnapshot> for VariableStatsResponse {
    fn from(snapshot: VariableSnapshot) -> Self {
        Self {
            name: snapshot.name,
            ttl_seconds: snapshot.ttl_seconds,
            cached_at: snapshot.cached_at,
            hits: snapshot.stats.hits,
            refreshes: snapshot.stats.refreshes,
            fallbacks: snapshot.stats.fallbacks,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Lookups served from cache, across all variables
    pub hits: u64,
    /// Lookups that refreshed from disk
    pub refreshes: u64,
    /// Refreshes that fell back to the default
    pub fallbacks: u64,
    /// Hit rate (hits / (hits + refreshes))
    pub hit_rate: f64,
    /// Per-variable breakdown, in declaration order
    pub variables: Vec<VariableStatsResponse>,
}

impl StatsResponse {
    /// Creates a new StatsResponse, totalling the per-variable counters
    pub fn new(snapshots: Vec<VariableSnapshot>) -> Self {
        let mut totals = ResolveStats::new();
        for snapshot in &snapshots {
            totals.merge(&snapshot.stats);
        }

        Self {
            hits: totals.hits,
            refreshes: totals.refreshes,
            fallbacks: totals.fallbacks,
            hit_rate: totals.hit_rate(),
            variables: snapshots.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Number of registered variables
    pub variables: usize,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(variables: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            variables,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
