//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `MASK_OFF` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use mask_off::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Journal stored in {}", config.storage.data_dir.display());
//! ```

mod ai;
mod error;
mod logging;
mod storage;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use storage::StorageConfig;

use secrecy::Secret;
use serde::Deserialize;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "MASK_OFF";

/// Conventional variable consulted when `MASK_OFF__AI__API_KEY` is unset
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Text-generation service (Gemini)
    #[serde(default)]
    pub ai: AiConfig,

    /// Local persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MASK_OFF` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Falls back to `GEMINI_API_KEY` for the API key
    ///
    /// # Environment Variable Format
    ///
    /// - `MASK_OFF__AI__MODEL=gemini-2.5-flash` -> `ai.model`
    /// - `MASK_OFF__STORAGE__DATA_DIR=/var/lib/mask-off` -> `storage.data_dir`
    /// - `MASK_OFF__LOGGING__FORMAT=json` -> `logging.format`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if !config.ai.has_api_key() {
            if let Ok(key) = std::env::var(GEMINI_API_KEY_VAR) {
                if !key.trim().is_empty() {
                    config.ai.api_key = Some(Secret::new(key));
                }
            }
        }

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// A missing API key is not an error: requests then fail at the service
    /// and the journey falls back to fixed copy.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "MASK_OFF__AI__API_KEY",
        "MASK_OFF__AI__MODEL",
        "MASK_OFF__AI__TIMEOUT_SECS",
        "MASK_OFF__STORAGE__DATA_DIR",
        "MASK_OFF__STORAGE__KEY_PREFIX",
        "MASK_OFF__LOGGING__LEVEL",
        "MASK_OFF__LOGGING__FORMAT",
        GEMINI_API_KEY_VAR,
    ];

    /// Helper to clear environment variables before and after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn key_of(config: &AppConfig) -> Option<String> {
        config.ai.api_key.as_ref().map(|k| k.expose_secret().clone())
    }

    #[test]
    fn test_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.ai.model, "gemini-2.5-flash");
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
        assert_eq!(config.storage.key_prefix, "maskoff_");
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("MASK_OFF__AI__MODEL", "gemini-2.5-pro");
        env::set_var("MASK_OFF__AI__TIMEOUT_SECS", "30");
        env::set_var("MASK_OFF__STORAGE__DATA_DIR", "/tmp/mask-off");
        env::set_var("MASK_OFF__STORAGE__KEY_PREFIX", "test_");
        env::set_var("MASK_OFF__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.model, "gemini-2.5-pro");
        assert_eq!(config.ai.timeout_secs, 30);
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/mask-off"));
        assert_eq!(config.storage.key_prefix, "test_");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_prefixed_api_key() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("MASK_OFF__AI__API_KEY", "prefixed-key");
        env::set_var(GEMINI_API_KEY_VAR, "plain-key");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(key_of(&result.unwrap()).as_deref(), Some("prefixed-key"));
    }

    #[test]
    fn test_gemini_api_key_fallback() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(GEMINI_API_KEY_VAR, "plain-key");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.ai.has_api_key());
        assert_eq!(key_of(&config).as_deref(), Some("plain-key"));
    }

    #[test]
    fn test_missing_key_is_valid() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert!(!config.ai.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_level_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("MASK_OFF__LOGGING__LEVEL", "chatty");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_unparseable_number_fails_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("MASK_OFF__AI__TIMEOUT_SECS", "soon");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
