use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::evaluator::ResumeEvaluator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Job profile, keyword matcher and the embedding model, built once at startup.
    pub evaluator: Arc<ResumeEvaluator>,
}
