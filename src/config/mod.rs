pub mod analysis;
pub mod database;
pub mod pipeline;

use std::env;

/// Parse an environment variable, falling back to `default` when unset or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(var_name: &str, default: T) -> T {
    env::var(var_name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
