//! Application state management
use std::path::PathBuf;

use tas_core::{AuthContext, Config, Result};

const CONFIG_PATH_ENV: &str = "TAS_CONFIG";

/// Owns the authentication context for the lifetime of the shell
pub struct AppState {
    context: AuthContext,
}

impl AppState {
    pub fn new() -> Result<Self> {
        let config = Config::load(Self::config_path())?.apply_env()?;
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            context: AuthContext::new(config)?,
        })
    }

    pub async fn initialize(&self) -> Result<()> {
        self.context.init().await?;
        Ok(())
    }

    pub fn context(&self) -> &AuthContext {
        &self.context
    }

    pub fn shutdown(&self) {
        self.context.shutdown();
    }

    fn config_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("tas.json"))
    }
}
