use crate::backend::{AnalysisBackend, GeminiClient};
use crate::config::AppConfig;
use std::sync::Arc;

/// Shared application state
///
/// The backend is an injected trait object rather than a module-level
/// singleton so the request pipeline can be exercised against a mock.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration
    pub config: Arc<AppConfig>,

    /// LLM backend client (shared across requests, internally stateless)
    pub backend: Arc<dyn AnalysisBackend>,
}

impl AppState {
    /// Create state backed by the real Gemini client.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let backend = Arc::new(GeminiClient::from_config(&config)?);
        Ok(Self::with_backend(config, backend))
    }

    /// Create state with an explicit backend. Test entry point.
    pub fn with_backend(config: AppConfig, backend: Arc<dyn AnalysisBackend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
        }
    }
}
