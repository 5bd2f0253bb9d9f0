//! Thin HTTP adapter over the service-job lifecycle engine.
//!
//! Handlers contain no business logic of their own; they translate HTTP
//! requests into repository / coordinator calls and map errors to JSON
//! responses.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
