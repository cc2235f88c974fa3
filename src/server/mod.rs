//! Axum-based HTTP server for vision-relay.
//!
//! This module sets up the HTTP server, wires routes to the two pipelines,
//! and turns pipeline results into JSON envelopes with the right status.
//!
//! # Components
//!
//! - `handlers`: Upload endpoints plus health, metrics and the index page.
//! - `middleware`: Request ID, CORS and compression layers.
//! - `routes`: The router and the shared application state.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use routes::{create_router, AppState};
