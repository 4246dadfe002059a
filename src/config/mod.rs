use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Base URL used when no API URL is configured
pub const DEFAULT_BASE_URL: &str = "/api";

/// Origin that relative base URLs are resolved against
pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";

/// Every request shares this timeout; it is not configurable per call
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Configured base URL, `None` when the environment leaves it unset
    pub base_url: Option<String>,
    pub origin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

impl ApiConfig {
    /// Configured base URL or the `/api` fallback
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        REQUEST_TIMEOUT
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            origin: Some(DEFAULT_ORIGIN.to_string()),
        }
    }
}

impl AdminConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match get("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let mut config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        };

        // Api overrides
        if let Some(v) = get("ADMIN_API_URL").or_else(|| get("VITE_API_URL")) {
            config.api.base_url = Some(v);
        }
        if let Some(v) = get("ADMIN_API_ORIGIN") {
            config.api.origin = Some(v);
        }

        // Logging overrides
        if let Some(v) = get("ADMIN_LOG") {
            config.logging.filter = v;
        }

        config
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig::default(),
            logging: LoggingConfig {
                filter: "debug".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig::default(),
            logging: LoggingConfig {
                filter: "info".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig::default(),
            logging: LoggingConfig {
                filter: "warn".to_string(),
            },
        }
    }
}

// Global config for the binary - initialized once at startup
pub static CONFIG: Lazy<AdminConfig> = Lazy::new(AdminConfig::from_env);

pub fn config() -> &'static AdminConfig {
    &CONFIG
}
