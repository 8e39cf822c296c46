use std::sync::Arc;

use crate::config::Config;
use crate::grading::evaluator::Evaluator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable evaluator. Default: `LlmClient` against the configured endpoint.
    pub evaluator: Arc<dyn Evaluator>,
    pub config: Config,
}
