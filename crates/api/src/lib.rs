//! HTTP API layer for teamlunch.
//!
//! JSON endpoints for users, restaurants, votes and weekly winners, built on
//! Axum 0.8. The router is mounted under `/api` by the server.

pub mod endpoints;
pub mod middleware;

pub use endpoints::router;
pub use middleware::AppState;
