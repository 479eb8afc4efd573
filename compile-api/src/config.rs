use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "https://wandbox.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the compile service, without the `/api` suffix
    pub api_url: String,

    /// Per-request timeout, written in seconds (fractions allowed)
    #[serde(rename = "timeout_secs", with = "duration_secs")]
    pub timeout: Duration,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("compiler-bot/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `COMPILER_API_URL` and `COMPILER_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(api_url) = env::var("COMPILER_API_URL") {
            config.api_url = api_url;
        }

        if let Ok(timeout) = env::var("COMPILER_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(
                    "Invalid COMPILER_TIMEOUT_SECS value '{}', using default {}s",
                    timeout,
                    config.timeout.as_secs()
                ),
            }
        }

        config
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.api_url.trim_end_matches('/'), path)
    }
}

mod duration_secs {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let config = ClientConfig::new().with_api_url("http://localhost:9000/");
        assert_eq!(
            config.endpoint("list.json"),
            "http://localhost:9000/api/list.json"
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_sub_second_timeout_is_kept() {
        let config = ClientConfig::new().with_timeout(Duration::from_millis(1500));
        assert_eq!(config.timeout(), Duration::from_millis(1500));

        let config: ClientConfig = serde_json::from_str(r#"{"timeout_secs": 0.25}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_negative_timeout_rejected() {
        assert!(serde_json::from_str::<ClientConfig>(r#"{"timeout_secs": -1}"#).is_err());
    }

    #[test]
    fn test_zero_env_timeout_keeps_default() {
        env::set_var("COMPILER_TIMEOUT_SECS", "0");
        let config = ClientConfig::from_env();
        env::remove_var("COMPILER_TIMEOUT_SECS");

        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
