//! Provider configuration
//!
//! Loaded from an optional JSON file, then overridden from the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use tas_session::Credential;

use crate::error::CoreError;
use crate::Result;

const TIMEOUT_ENV: &str = "TAS_BACKEND_TIMEOUT_MS";
const AUTO_LOGIN_ENV: &str = "TAS_AUTO_LOGIN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider identifier registered with the host
    pub provider_id: String,
    /// Human-readable provider name, used in the status text
    pub provider_label: String,
    /// Deadline for a single credential backend call
    pub backend_timeout_ms: u64,
    /// Log in during startup when no session exists
    pub auto_login: bool,
    /// Stub credential handed out by the static backend
    pub credential: Credential,
}

impl Config {
    /// Read `path` as JSON; a missing file yields the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `TAS_BACKEND_TIMEOUT_MS` and `TAS_AUTO_LOGIN` overrides
    pub fn apply_env(mut self) -> Result<Self> {
        self.apply_overrides(
            std::env::var(TIMEOUT_ENV).ok().as_deref(),
            std::env::var(AUTO_LOGIN_ENV).ok().as_deref(),
        )?;
        Ok(self)
    }

    fn apply_overrides(&mut self, timeout: Option<&str>, auto_login: Option<&str>) -> Result<()> {
        if let Some(raw) = timeout {
            self.backend_timeout_ms = raw
                .trim()
                .parse()
                .map_err(|_| CoreError::Config(format!("{TIMEOUT_ENV} is not a number: {raw}")))?;
        }

        if let Some(raw) = auto_login {
            self.auto_login = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(CoreError::Config(format!(
                        "{AUTO_LOGIN_ENV} is not a boolean: {raw}"
                    )))
                }
            };
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend_timeout_ms == 0 {
            return Err(CoreError::Config(
                "backend_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.provider_label.trim().is_empty() {
            return Err(CoreError::Config("provider_label cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_millis(self.backend_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider_id: "tas".to_string(),
            provider_label: "TAS".to_string(),
            backend_timeout_ms: 10_000,
            auto_login: false,
            credential: Credential::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backend_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"provider_label": "Acme", "backend_timeout_ms": 250, "auto_login": true}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.provider_label, "Acme");
        assert_eq!(config.backend_timeout(), Duration::from_millis(250));
        assert!(config.auto_login);
        // Unspecified fields keep their defaults
        assert_eq!(config.provider_id, "tas");
        assert_eq!(config.credential.account_label, "Auth API Sample");
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"backend_timeout_ms": 0}"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            Config::load(&path).unwrap_err(),
            CoreError::Serialization(_)
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some("1500"), Some("yes")).unwrap();
        assert_eq!(config.backend_timeout_ms, 1500);
        assert!(config.auto_login);

        assert!(config.apply_overrides(Some("soon"), None).is_err());
        assert!(config.apply_overrides(None, Some("maybe")).is_err());
        assert!(config.apply_overrides(Some("0"), None).is_err());
    }
}
