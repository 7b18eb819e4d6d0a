//! HTTP layer of the Tomati marketplace server.
//!
//! Routing, authentication middleware, request handlers, and
//! configuration loading. Domain logic lives in `tomati-core`.

pub mod auth;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
