use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_LLM_BASE_URL: &str = "https://api.moonshot.cn/v1";
const DEFAULT_LLM_MODEL: &str = "moonshot-v1-8k";

/// Application configuration loaded from environment variables.
/// Nothing is required: without `LLM_API_KEY` every request uses the synthesizer.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    /// Fixes the fallback entropy for reproducible output.
    pub synth_seed: Option<u64>,
    /// JSON file replacing the built-in template tables.
    pub synth_tables_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            llm_api_key: non_empty("LLM_API_KEY"),
            llm_base_url: non_empty("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            llm_model: non_empty("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            llm_timeout_secs: parse_or("LLM_TIMEOUT_SECS", non_empty("LLM_TIMEOUT_SECS"), 60)?,
            synth_seed: non_empty("SYNTH_SEED")
                .map(|v| v.trim().parse::<u64>())
                .transpose()
                .context("SYNTH_SEED must be an unsigned integer")?,
            synth_tables_path: non_empty("SYNTH_TABLES_PATH").map(PathBuf::from),
            port: parse_or("PORT", non_empty("PORT"), 8080)?,
            rust_log: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{v}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let c = config(&[]).unwrap();
        assert!(c.llm_api_key.is_none());
        assert_eq!(c.llm_base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(c.llm_model, DEFAULT_LLM_MODEL);
        assert_eq!(c.llm_timeout_secs, 60);
        assert_eq!(c.port, 8080);
        assert_eq!(c.rust_log, "info");
        assert!(c.synth_seed.is_none());
        assert!(c.synth_tables_path.is_none());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let c = config(&[("LLM_API_KEY", "   ")]).unwrap();
        assert!(c.llm_api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let c = config(&[
            ("LLM_API_KEY", "sk-live"),
            ("LLM_BASE_URL", "https://api.openai.com/v1"),
            ("LLM_MODEL", "gpt-3.5-turbo"),
            ("SYNTH_SEED", "42"),
            ("SYNTH_TABLES_PATH", "/etc/muse/tables.json"),
            ("PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(c.llm_api_key.as_deref(), Some("sk-live"));
        assert_eq!(c.llm_model, "gpt-3.5-turbo");
        assert_eq!(c.synth_seed, Some(42));
        assert_eq!(
            c.synth_tables_path,
            Some(PathBuf::from("/etc/muse/tables.json"))
        );
        assert_eq!(c.port, 9000);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("SYNTH_SEED", "-1")]).is_err());
        assert!(config(&[("LLM_TIMEOUT_SECS", "soon")]).is_err());
    }
}
