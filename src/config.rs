//! Centralized configuration management for lumibank

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

pub const DEFAULT_API_BASE_URL: &str = "https://lumibank-backend-edqo6jv53q-et.a.run.app";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend endpoints
    pub api: ApiConfig,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Terminal UI timing
    pub ui: UiConfig,
    /// Log file written by the tracing appender
    pub log_file: PathBuf,
}

/// Backend base URL and endpoint paths
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub register_path: String,
    pub send_otp_path: String,
    pub change_password_path: String,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds; no timeout when unset
    pub timeout_seconds: Option<u64>,
    /// User agent string
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    /// How long an auto-dismissing alert stays open (milliseconds)
    pub alert_auto_dismiss_ms: u64,
    /// Event loop poll interval (milliseconds)
    pub tick_rate_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            register_path: "/api/auth/register".to_string(),
            send_otp_path: "/api/forget-password/send".to_string(),
            change_password_path: "/api/forget-password/change-password".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: "lumibank/0.1.0".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            alert_auto_dismiss_ms: 3000,
            tick_rate_ms: 200,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            http: HttpConfig::default(),
            ui: UiConfig::default(),
            log_file: PathBuf::from("lumibank.log"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let api = ApiConfig {
            base_url: env_or("LUMIBANK_API_BASE_URL", &defaults.api.base_url),
            register_path: env_or("LUMIBANK_REGISTER_PATH", &defaults.api.register_path),
            send_otp_path: env_or("LUMIBANK_SEND_OTP_PATH", &defaults.api.send_otp_path),
            change_password_path: env_or(
                "LUMIBANK_CHANGE_PASSWORD_PATH",
                &defaults.api.change_password_path,
            ),
        };

        let http = HttpConfig {
            timeout_seconds: parse_env_var("LUMIBANK_HTTP_TIMEOUT_SECONDS")?,
            user_agent: env_or("LUMIBANK_USER_AGENT", &defaults.http.user_agent),
        };

        let ui = UiConfig {
            alert_auto_dismiss_ms: parse_env_var("LUMIBANK_ALERT_DISMISS_MS")?
                .unwrap_or(defaults.ui.alert_auto_dismiss_ms),
            tick_rate_ms: parse_env_var("LUMIBANK_TICK_RATE_MS")?
                .unwrap_or(defaults.ui.tick_rate_ms),
        };

        let log_file = std::env::var("LUMIBANK_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);

        Ok(Config {
            api,
            http,
            ui,
            log_file,
        })
    }

    /// Full URL for an endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http.timeout_seconds.map(Duration::from_secs)
    }

    pub fn alert_auto_dismiss(&self) -> Duration {
        Duration::from_millis(self.ui.alert_auto_dismiss_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base = &self.api.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "API base URL must start with http:// or https://: {}",
                base
            ));
        }

        if self.ui.alert_auto_dismiss_ms == 0 {
            return Err(anyhow::anyhow!("Alert auto-dismiss interval must be greater than zero"));
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(anyhow::anyhow!("Tick rate must be greater than zero"));
        }

        // Log file must go into an existing directory
        if let Some(parent) = self.log_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(anyhow::anyhow!(
                    "Log file directory does not exist: {}",
                    parent.display()
                ));
            }
        }

        Ok(())
    }
}

fn env_or(var_name: &str, default: &str) -> String {
    std::env::var(var_name).unwrap_or_else(|_| default.to_string())
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
