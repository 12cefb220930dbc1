use std::sync::Arc;

use t20_core::sheet::SheetRenderer;
use t20_core::stats::StatAdjustmentTable;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: t20_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Race and class stat adjustments used by every stat derivation.
    pub stat_rules: Arc<StatAdjustmentTable>,
    /// Renderer behind `GET /characters/{id}/sheet`.
    pub sheet_renderer: Arc<dyn SheetRenderer>,
}
