//! API Handlers
//!
//! HTTP request handlers. Every handler that references a variable resolves
//! it through the registry, exactly as a request pipeline would.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use crate::cache::ValueSource;
use crate::clock::{Clock, SystemClock};
use crate::error::{ApiError, Result};
use crate::models::{HealthResponse, StatsResponse, VariableResponse, VariablesResponse};
use crate::registry::{Registry, Variable};

/// Application state shared across all handlers.
///
/// The registry is read-only after startup; each variable carries its own
/// lock for resolution.
#[derive(Clone)]
pub struct AppState {
    /// Registered variables
    pub registry: Arc<Registry>,
    /// Time source for staleness checks
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates a new AppState over a loaded registry, using the system clock.
    pub fn new(registry: Registry) -> Self {
        Self::with_clock(registry, Arc::new(SystemClock::new()))
    }

    /// Creates a new AppState with an explicit time source.
    pub fn with_clock(registry: Registry, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: Arc::new(registry),
            clock,
        }
    }
}

async fn resolve_variable(variable: &Variable, now: i64) -> VariableResponse {
    let resolved = variable.resolve(now).await;

    if resolved.meta.source == ValueSource::Default {
        debug!(
            variable = variable.name(),
            value = %resolved.value,
            "source file unusable, serving default"
        );
    }

    VariableResponse::new(variable.name(), resolved)
}

/// Handler for GET /var/:name
///
/// Resolves one variable.
pub async fn var_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<VariableResponse>> {
    let variable = state
        .registry
        .lookup(&name)
        .ok_or(ApiError::NotFound(name))?;

    let now = state.clock.unix_seconds();
    Ok(Json(resolve_variable(variable, now).await))
}

/// Handler for GET /vars
///
/// Resolves every registered variable as part of one request.
pub async fn vars_handler(State(state): State<AppState>) -> Json<VariablesResponse> {
    let now = state.clock.unix_seconds();

    let mut variables = Vec::with_capacity(state.registry.len());
    for variable in state.registry.iter() {
        variables.push(resolve_variable(variable, now).await);
    }

    Json(VariablesResponse { variables })
}

/// Handler for GET /stats
///
/// Returns resolution counters per variable and in total.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let mut snapshots = Vec::with_capacity(state.registry.len());
    for variable in state.registry.iter() {
        snapshots.push(variable.snapshot().await);
    }

    Json(StatsResponse::new(snapshots))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.registry.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::fs;
    use tempfile::TempDir;

    const T0: i64 = 1_700_000_000;

    fn state_with(dir: &TempDir, clock: Arc<ManualClock>) -> AppState {
        let color = dir.path().join("color.txt");
        fs::write(&color, "blue\n").unwrap();

        let mut registry = Registry::new();
        registry
            .register("$color", color.to_str().unwrap(), "red", None)
            .unwrap();
        registry
            .register("$size", "/nonexistent/txtset/size", "medium", Some("60"))
            .unwrap();

        AppState::with_clock(registry, clock)
    }

    #[tokio::test]
    async fn test_var_handler_resolves() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, Arc::new(ManualClock::new(T0)));

        let response = var_handler(State(state), Path("color".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, "blue");
        assert_eq!(response.source, ValueSource::File);
    }

    #[tokio::test]
    async fn test_var_handler_unknown_variable() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, Arc::new(ManualClock::new(T0)));

        let result = var_handler(State(state), Path("missing".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(ref name)) if name == "missing"));
    }

    #[tokio::test]
    async fn test_var_handler_follows_clock() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(T0));
        let state = state_with(&dir, clock.clone());

        let first = var_handler(State(state.clone()), Path("color".to_string()))
            .await
            .unwrap();
        assert_eq!(first.value, "blue");
        fs::write(dir.path().join("color.txt"), "green").unwrap();

        clock.advance(9);
        let response = var_handler(State(state.clone()), Path("color".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, "blue");
        assert_eq!(response.source, ValueSource::Cache);

        clock.advance(2);
        let response = var_handler(State(state), Path("color".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, "green");
        assert_eq!(response.source, ValueSource::File);
    }

    #[tokio::test]
    async fn test_vars_handler_resolves_all() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, Arc::new(ManualClock::new(T0)));

        let response = vars_handler(State(state)).await;
        let values: Vec<(&str, &str)> = response
            .variables
            .iter()
            .map(|v| (v.name.as_str(), v.value.as_str()))
            .collect();
        assert_eq!(values, vec![("color", "blue"), ("size", "medium")]);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, Arc::new(ManualClock::new(T0)));

        let first = vars_handler(State(state.clone())).await;
        let second = vars_handler(State(state.clone())).await;
        assert_eq!(first.variables[0].source, ValueSource::File);
        assert_eq!(second.variables[0].source, ValueSource::Cache);

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 2);
        assert_eq!(response.refreshes, 2);
        assert_eq!(response.fallbacks, 1);
        assert_eq!(response.variables[1].ttl_seconds, 60);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, Arc::new(ManualClock::new(T0)));

        let response = health_handler(State(state)).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.variables, 2);
    }
}
