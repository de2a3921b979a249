//! Centralized configuration management for deskboard

use std::time::Duration;
use anyhow::{Result, Context};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base address of the remote REST API
    pub api_url: String,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Initial interface preferences
    pub ui: UiConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds; requests wait indefinitely when unset
    pub timeout_seconds: Option<u64>,
    /// User agent string
    pub user_agent: String,
}

/// Interface preferences applied when the application context is created
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// "dark" or "light"
    pub theme: String,
    /// Whether success notifications are shown in the status bar
    pub notifications: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: "deskboard/0.1.0".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            notifications: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http: HttpConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("DESKBOARD_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let http = HttpConfig {
            timeout_seconds: parse_env_var("DESKBOARD_HTTP_TIMEOUT_SECONDS")?,
            user_agent: std::env::var("DESKBOARD_USER_AGENT")
                .unwrap_or_else(|_| "deskboard/0.1.0".to_string()),
        };

        let ui = UiConfig {
            theme: std::env::var("DESKBOARD_THEME").unwrap_or_else(|_| "dark".to_string()),
            notifications: parse_env_var("DESKBOARD_NOTIFICATIONS")?.unwrap_or(true),
        };

        Ok(Config { api_url, http, ui })
    }

    /// Replace the API base address, e.g. from a command line flag
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self
    }

    /// API base address without a trailing slash
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http.timeout_seconds.map(Duration::from_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.api_url)
            .with_context(|| format!("Invalid API URL: {}", self.api_url))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(anyhow::anyhow!(
                "API URL must use http or https, got '{}'",
                url.scheme()
            ));
        }

        if self.http.timeout_seconds == Some(0) {
            return Err(anyhow::anyhow!("HTTP timeout must be greater than zero"));
        }

        match self.ui.theme.to_lowercase().as_str() {
            "dark" | "light" => Ok(()),
            other => Err(anyhow::anyhow!(
                "Unsupported theme: {}. Supported themes: dark, light",
                other
            )),
        }
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base(), "http://127.0.0.1:5000");
        assert_eq!(config.http_timeout(), None);
        assert_eq!(config.http.user_agent, "deskboard/0.1.0");
        assert!(config.ui.notifications);
    }

    #[test]
    fn test_config_validation() {
        Config::default().validate().unwrap();

        let bad_scheme = Config::default().with_api_url(Some("ftp://files.local".to_string()));
        assert!(bad_scheme.validate().is_err());

        let mut bad_theme = Config::default();
        bad_theme.ui.theme = "neon".to_string();
        assert!(bad_theme.validate().is_err());

        let mut zero_timeout = Config::default();
        zero_timeout.http.timeout_seconds = Some(0);
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn test_api_url_override_strips_trailing_slash() {
        let config = Config::default().with_api_url(Some("http://10.0.0.2:8080/".to_string()));
        assert_eq!(config.api_base(), "http://10.0.0.2:8080");

        let unchanged = Config::default().with_api_url(None);
        assert_eq!(unchanged.api_base(), DEFAULT_API_URL);
    }

    #[test]
    fn test_parse_env_var_reports_bad_values() {
        std::env::set_var("DESKBOARD_TEST_TIMEOUT", "soon");
        let parsed: Result<Option<u64>> = parse_env_var("DESKBOARD_TEST_TIMEOUT");
        assert!(parsed.is_err());

        std::env::set_var("DESKBOARD_TEST_TIMEOUT", "15");
        let parsed: Option<u64> = parse_env_var("DESKBOARD_TEST_TIMEOUT").unwrap();
        assert_eq!(parsed, Some(15));

        std::env::remove_var("DESKBOARD_TEST_TIMEOUT");
        let parsed: Option<u64> = parse_env_var("DESKBOARD_TEST_TIMEOUT").unwrap();
        assert_eq!(parsed, None);
    }
}
