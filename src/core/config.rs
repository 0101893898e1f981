//! Configuration for the console backend connection.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::errors::{ConsoleError, ConsoleResult};

/// Environment variable for a custom backend URL (e.g. `http://10.0.0.4:8000`).
const BACKEND_URL_ENV: &str = "CALLIOPE_BACKEND_URL";

/// Default backend base URL.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Configuration for the console services.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the agent backend, without a trailing slash requirement.
    pub base_url: String,
    /// Request timeout.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Connection timeout.
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            // Agent turns can run long; roster calls reuse the same client.
            request_timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ConsoleConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from the environment, falling back to defaults.
    ///
    /// Reads `CALLIOPE_BACKEND_URL` for the backend base URL.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            config.base_url = url;
        }
        config
    }

    /// Set the backend base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL does not parse as an absolute URL.
    pub fn validate(&self) -> ConsoleResult<()> {
        let url = Url::parse(&self.base_url)?;
        if url.host_str().is_none() {
            return Err(ConsoleError::Config(format!(
                "base_url has no host: {}",
                self.base_url
            )));
        }
        Ok(())
    }

    /// The base URL with any trailing slash removed, ready for joining.
    #[must_use]
    pub fn trimmed_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConsoleConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ConsoleConfig::new()
            .with_base_url("http://10.1.2.3:9000/")
            .with_request_timeout(Duration::from_secs(30));

        assert_eq!(config.trimmed_base(), "http://10.1.2.3:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let config = ConsoleConfig::new().with_base_url("not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_serde() {
        let config = ConsoleConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ConsoleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.request_timeout, config.request_timeout);
    }
}
