use super::env_or;
use std::env;
use std::time::Duration;

pub const DEFAULT_LOCALE: &str = "en";

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Language tag sent with every analysis request.
    pub locale: String,
    /// Upper bound for each external call (fetch, each analysis call, persist).
    pub stage_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            stage_timeout: Duration::from_secs(30),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let locale = env::var("AI_LANGUAGE_LOCALE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.locale);
        let secs = env_or("PIPELINE_STAGE_TIMEOUT_SECS", defaults.stage_timeout.as_secs());

        Self {
            locale,
            stage_timeout: Duration::from_secs(secs.max(1)),
        }
    }
}
