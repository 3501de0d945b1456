// Note and scholar generation.
// Every section is model-first with a synthesizer fallback; all model calls go
// through the `LanguageModel` trait in llm_client.

pub mod fallback;
pub mod handlers;
pub mod notes;
pub mod prompts;
pub mod scholar;
