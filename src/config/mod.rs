// src/config/mod.rs
// Caption generator configuration, loaded from the environment (and .env via the binary)

use anyhow::{Result, anyhow};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionConfig {
    // ── Gemini credentials
    pub api_key: Option<String>,

    // ── Model selection
    pub model: String,
    pub base_url: String,

    // ── Timeouts (in seconds, unset means wait for the API)
    pub timeout_secs: Option<u64>,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

/// Strip trailing `# comment` text and surrounding whitespace from a raw env value.
fn clean_value(raw: &str) -> &str {
    raw.split('#').next().unwrap_or("").trim()
}

fn lookup_string<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    let clean = clean_value(&raw);
    if clean.is_empty() {
        None
    } else {
        Some(clean.to_string())
    }
}

fn lookup_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup_string(lookup, key) {
        Some(val) => match val.parse::<T>() {
            Ok(parsed) => {
                debug!("Config: {} = {} (from environment)", key, val);
                parsed
            }
            Err(_) => {
                warn!("Config: {} = '{}' (parse failed, using default)", key, val);
                default
            }
        },
        None => default,
    }
}

impl CaptionConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup_string(&lookup, "GEMINI_API_KEY")
            .or_else(|| lookup_string(&lookup, "API_KEY"));

        let timeout_secs = lookup_string(&lookup, "GEMINI_TIMEOUT_SECS").and_then(|val| {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    warn!("Config: GEMINI_TIMEOUT_SECS = '{}' ignored, no timeout applied", val);
                    None
                }
            }
        });

        Self {
            api_key,
            model: lookup_or(&lookup, "GEMINI_MODEL", DEFAULT_MODEL.to_string()),
            base_url: lookup_or(&lookup, "GEMINI_BASE_URL", DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs,
        }
    }

    /// Override the model, as the CLI `--model` flag does.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow!("GEMINI_API_KEY not set (API_KEY is also accepted)"))
    }

    /// Full generateContent endpoint for the configured model, without the key.
    pub fn generate_content_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> CaptionConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CaptionConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, CaptionConfig::default());
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(config.timeout().is_none());
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_api_key_fallback() {
        let config = config_from(&[("API_KEY", "legacy")]);
        assert_eq!(config.require_api_key().unwrap(), "legacy");

        let config = config_from(&[("API_KEY", "legacy"), ("GEMINI_API_KEY", "primary")]);
        assert_eq!(config.require_api_key().unwrap(), "primary");
    }

    #[test]
    fn test_values_strip_comments() {
        let config = config_from(&[
            ("GEMINI_MODEL", "gemini-2.0-flash   # cheaper"),
            ("GEMINI_TIMEOUT_SECS", " 30 "),
            ("GEMINI_BASE_URL", "http://localhost:8080/v1beta/"),
        ]);
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.generate_content_url(),
            "http://localhost:8080/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_bad_timeout_means_none() {
        assert_eq!(config_from(&[("GEMINI_TIMEOUT_SECS", "soon")]).timeout_secs, None);
        assert_eq!(config_from(&[("GEMINI_TIMEOUT_SECS", "0")]).timeout_secs, None);
    }

    #[test]
    fn test_with_model() {
        let config = config_from(&[]).with_model("gemini-pro-vision");
        assert!(config.generate_content_url().ends_with("/models/gemini-pro-vision:generateContent"));
    }
}
