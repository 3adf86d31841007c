use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Built once in `main` and held for the process lifetime. Both endpoints are
/// stateless; nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    #[allow(dead_code)]
    pub config: Config,
}
