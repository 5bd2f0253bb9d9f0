use std::sync::Arc;

use atolye_core::photo_wait::PhotoWaitCoordinator;
use atolye_dispatch::QuoteDispatcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: atolye_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Process-wide photo-wait signal slot.
    pub photo_wait: Arc<PhotoWaitCoordinator>,
    /// Quote dispatch coordinator (renderer + SMTP transport).
    pub dispatcher: Arc<QuoteDispatcher>,
}
