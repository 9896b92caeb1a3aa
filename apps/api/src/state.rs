use crate::config::Config;
use crate::optimize::OptimizeService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub optimizer: OptimizeService,
    pub config: Config,
}
