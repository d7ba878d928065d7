use super::env_or;
use std::env;

pub const DEFAULT_API_VERSION: &str = "2023-04-01";

#[derive(Clone, Debug)]
pub struct TextAnalysisConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub timeout_secs: u64,
}

impl TextAnalysisConfig {
    /// Read the language service settings from the environment.
    /// Returns None unless both endpoint and key are set (graceful degradation).
    pub fn from_env() -> Option<Self> {
        let endpoint = env::var("AI_LANGUAGE_ENDPOINT")
            .ok()
            .filter(|s| !s.trim().is_empty())?;
        let api_key = env::var("AI_LANGUAGE_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())?;
        let api_version = env::var("AI_LANGUAGE_API_VERSION")
            .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string());
        let timeout_secs = env_or("AI_LANGUAGE_TIMEOUT_SECS", 30);

        Some(Self {
            endpoint,
            api_key,
            api_version,
            timeout_secs,
        })
    }
}
