//! Configuration and settings management
//!
//! Loads settings from environment variables and defines delivery constants.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_token: String,

    /// Gemini API key. When present, unclassified resolver failures are
    /// answered with a generated message instead of the static fallback.
    pub gemini_api_key: Option<String>,

    /// Endpoint of the Instagram URL resolver service. The service accepts a
    /// page URL and answers with the direct media URLs behind it.
    #[serde(default = "default_resolver_url")]
    pub resolver_url: String,

    /// Port for the liveness HTTP listener
    #[serde(default = "default_health_port")]
    pub health_port: u16,
}

fn default_resolver_url() -> String {
    "http://127.0.0.1:8080/resolve".to_string()
}

const fn default_health_port() -> u16 {
    3000
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails, including when the
    /// Telegram token is missing from the environment.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Environment::default() auto-converts UPPER_SNAKE_CASE to snake_case;
            // ignore_empty treats empty env vars as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        s.try_deserialize()
    }
}

/// Wait between two consecutive media dispatches to one chat, calibrated to
/// Telegram's flood limits.
pub const PACING_DELAY: Duration = Duration::from_secs(1);

/// Wait after a full delivery sequence, 10x the per-item pacing.
pub const COOL_DOWN_DELAY: Duration = Duration::from_secs(10);

/// Model used to phrase fallback error messages
pub const ERROR_MODEL: &str = "gemini-1.5-flash";

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    // Tests run sequentially to avoid environment variable race conditions
    #[test]
    fn test_config_env_loading() -> Result<(), Box<dyn std::error::Error>> {
        env::set_var("TELEGRAM_TOKEN", "dummy_token");
        env::set_var("RESOLVER_URL", "https://resolver.example/api");

        let settings = Settings::new()?;
        assert_eq!(settings.telegram_token, "dummy_token");
        assert_eq!(settings.resolver_url, "https://resolver.example/api");
        assert_eq!(settings.health_port, 3000);

        env::remove_var("RESOLVER_URL");

        // Empty env var is treated as unset, so the default applies
        env::set_var("RESOLVER_URL", "");
        let settings = Settings::new()?;
        assert_eq!(settings.resolver_url, default_resolver_url());

        env::remove_var("RESOLVER_URL");
        env::remove_var("TELEGRAM_TOKEN");
        Ok(())
    }

    #[test]
    fn test_cool_down_is_ten_times_pacing() {
        assert_eq!(COOL_DOWN_DELAY, PACING_DELAY * 10);
    }
}
