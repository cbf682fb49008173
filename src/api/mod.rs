//! API Module
//!
//! HTTP host that resolves registered variables per request.
//!
//! # Endpoints
//! - `GET /var/:name` - Resolve one variable
//! - `GET /vars` - Resolve every variable
//! - `GET /stats` - Resolution statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
