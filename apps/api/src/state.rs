use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::{LanguageModel, LlmClient};
use crate::synth::Synthesizer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after start-up; per-request inputs (API key,
/// seed) travel in the request body instead.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub synth: Arc<Synthesizer>,
    /// Model built from `LLM_API_KEY`, if configured.
    pub llm: Option<Arc<dyn LanguageModel>>,
}

impl AppState {
    /// The model to use for one request. A key supplied with the request
    /// overrides the configured one; `None` means synthesizer-only.
    pub fn language_model(
        &self,
        request_key: Option<&str>,
    ) -> Result<Option<Arc<dyn LanguageModel>>, AppError> {
        match request_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => {
                let client = LlmClient::new(
                    key,
                    &self.config.llm_base_url,
                    &self.config.llm_model,
                    Duration::from_secs(self.config.llm_timeout_secs),
                )
                .map_err(|e| AppError::Llm(format!("Failed to build LLM client: {e}")))?;
                Ok(Some(Arc::new(client)))
            }
            None => Ok(self.llm.clone()),
        }
    }

    /// Random source for one request: request seed, then configured seed, then OS entropy.
    pub fn rng(&self, request_seed: Option<u64>) -> StdRng {
        match request_seed.or(self.config.synth_seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
