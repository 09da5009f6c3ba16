//! Environment-driven configuration

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{IntakeError, IntakeResult};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_SESSION_FILE: &str = ".kivi_session.json";
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;
pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HOUSE_VARIANT: &str = "kivi";

/// Client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeConfig {
    pub api_url: String,
    pub session_file: PathBuf,
    pub http_timeout: Duration,
    pub log_level: String,
    pub reconciler: ReconcilerConfig,
}

/// Tuning for the reconciler
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilerConfig {
    /// Quiet period before a live suggestion lookup fires
    pub suggest_debounce: Duration,
    /// Shorter queries never reach the backend
    pub suggest_min_chars: usize,
    /// Variant label preselected when a product offers it
    pub house_variant: String,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            suggest_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            suggest_min_chars: DEFAULT_MIN_QUERY_CHARS,
            house_variant: DEFAULT_HOUSE_VARIANT.to_string(),
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            log_level: "info".to_string(),
            reconciler: ReconcilerConfig::default(),
        }
    }
}

impl IntakeConfig {
    /// Load from process environment, reading `.env` first if present
    pub fn from_env() -> IntakeResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> IntakeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("KIVI_API_URL").unwrap_or(defaults.api_url);
        let session_file = lookup("KIVI_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_file);
        let log_level = lookup("KIVI_LOG_LEVEL").unwrap_or(defaults.log_level);

        let http_timeout = match lookup("KIVI_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("KIVI_HTTP_TIMEOUT_SECS", &raw)?),
            None => defaults.http_timeout,
        };
        let suggest_debounce = match lookup("KIVI_SUGGEST_DEBOUNCE_MS") {
            Some(raw) => Duration::from_millis(parse_number("KIVI_SUGGEST_DEBOUNCE_MS", &raw)?),
            None => defaults.reconciler.suggest_debounce,
        };
        let suggest_min_chars = match lookup("KIVI_SUGGEST_MIN_CHARS") {
            Some(raw) => parse_number("KIVI_SUGGEST_MIN_CHARS", &raw)?,
            None => defaults.reconciler.suggest_min_chars,
        };
        let house_variant = lookup("KIVI_HOUSE_VARIANT").unwrap_or(defaults.reconciler.house_variant);

        let config = Self {
            api_url,
            session_file,
            http_timeout,
            log_level,
            reconciler: ReconcilerConfig {
                suggest_debounce,
                suggest_min_chars,
                house_variant,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn validate(&self) -> IntakeResult<()> {
        let url = Url::parse(&self.api_url).map_err(|e| IntakeError::ConfigError {
            message: format!("Invalid API URL '{}': {}", self.api_url, e),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(IntakeError::ConfigError {
                message: format!("API URL must be http or https: {}", self.api_url),
            });
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> IntakeResult<T> {
    raw.trim().parse().map_err(|_| IntakeError::ConfigError {
        message: format!("{key} must be a non-negative integer, got '{raw}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = IntakeConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, IntakeConfig::default());
        assert_eq!(config.reconciler.suggest_debounce, Duration::from_millis(250));
        assert_eq!(config.reconciler.suggest_min_chars, 2);
    }

    #[test]
    fn test_environment_overrides() {
        let config = IntakeConfig::from_lookup(lookup_from(&[
            ("KIVI_API_URL", "https://erp.example.com/api"),
            ("KIVI_SUGGEST_DEBOUNCE_MS", "400"),
            ("KIVI_SUGGEST_MIN_CHARS", "3"),
            ("KIVI_HOUSE_VARIANT", "premium"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://erp.example.com/api");
        assert_eq!(config.reconciler.suggest_debounce, Duration::from_millis(400));
        assert_eq!(config.reconciler.suggest_min_chars, 3);
        assert_eq!(config.reconciler.house_variant, "premium");
    }

    #[test]
    fn test_rejects_bad_numbers_and_urls() {
        let bad_number = IntakeConfig::from_lookup(lookup_from(&[("KIVI_SUGGEST_DEBOUNCE_MS", "soon")]));
        assert!(matches!(bad_number, Err(IntakeError::ConfigError { .. })));

        let bad_url = IntakeConfig::from_lookup(lookup_from(&[("KIVI_API_URL", "ftp://files")]));
        assert!(matches!(bad_url, Err(IntakeError::ConfigError { .. })));
    }
}
