use compile_api::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::Error;

/// Bot settings, usually read from a TOML file:
///
/// ```toml
/// [client]
/// api_url = "https://wandbox.org"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub client: ClientConfig,
}

impl BotConfig {
    pub fn from_toml(source: &str) -> Result<Self, Error> {
        Ok(toml::from_str(source)?)
    }

    /// Read `path` when given, otherwise fall back to the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                let source = std::fs::read_to_string(path)?;
                Self::from_toml(&source)
            }
            None => Ok(Self {
                client: ClientConfig::from_env(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_from_toml() {
        let config = BotConfig::from_toml(
            r#"
            [client]
            api_url = "http://localhost:8000"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.client.api_url, "http://localhost:8000");
        assert_eq!(config.client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = BotConfig::from_toml("").unwrap();
        assert_eq!(config.client.api_url, compile_api::DEFAULT_API_URL);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[client]\ntimeout_secs = 12").unwrap();

        let config = BotConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.client.timeout(), Duration::from_secs(12));
    }

    #[test]
    fn test_fractional_timeout_from_toml() {
        let config = BotConfig::from_toml("[client]\ntimeout_secs = 1.5").unwrap();
        assert_eq!(config.client.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            BotConfig::from_toml("[client\n"),
            Err(Error::Config(_))
        ));
    }
}
