//! Runtime configuration (spec §2.3): read once at startup, then immutable.
//!
//! Extends the teacher's `config.rs` (`Config{concurrency, per_host}`) with
//! the full tunable set spec.md needs, each environment-overridable but
//! defaulting to the exact value spec.md §4 specifies.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// `BACK_URL` — when set, the Reporter Resolver picks the Backend
    /// reporter instead of CLI.
    pub result_sink_url: Option<String>,
    pub fetch_timeout: Duration,
    pub fetch_retry_delay: Duration,
    pub backend_client_timeout: Duration,
    pub backend_retry_delay: Duration,
    pub backend_max_retries: u32,
    pub stealth_delay_min: Duration,
    pub stealth_delay_max: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            result_sink_url: None,
            fetch_timeout: Duration::from_secs(30),
            fetch_retry_delay: Duration::from_secs(2),
            backend_client_timeout: Duration::from_secs(5),
            backend_retry_delay: Duration::from_secs(2),
            backend_max_retries: 2,
            stealth_delay_min: Duration::from_millis(1_000),
            stealth_delay_max: Duration::from_millis(3_000),
        }
    }
}

impl RuntimeConfig {
    /// Reads `BACK_URL` and the `API_HUNTER_*` tunable overrides from the
    /// process environment, falling back to spec-matching defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.result_sink_url = std::env::var("BACK_URL").ok().filter(|s| !s.trim().is_empty());

        if let Some(secs) = env_u64("API_HUNTER_FETCH_TIMEOUT_SECS") {
            cfg.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("API_HUNTER_FETCH_RETRY_DELAY_SECS") {
            cfg.fetch_retry_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("API_HUNTER_BACKEND_CLIENT_TIMEOUT_SECS") {
            cfg.backend_client_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("API_HUNTER_BACKEND_RETRY_DELAY_SECS") {
            cfg.backend_retry_delay = Duration::from_secs(secs);
        }
        if let Some(n) = env_u64("API_HUNTER_BACKEND_MAX_RETRIES") {
            cfg.backend_max_retries = n as u32;
        }
        if let Some(ms) = env_u64("API_HUNTER_STEALTH_DELAY_MIN_MS") {
            cfg.stealth_delay_min = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("API_HUNTER_STEALTH_DELAY_MAX_MS") {
            cfg.stealth_delay_max = Duration::from_millis(ms);
        }

        cfg
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(30));
        assert_eq!(cfg.backend_max_retries, 2);
        assert!(cfg.result_sink_url.is_none());
    }
}
