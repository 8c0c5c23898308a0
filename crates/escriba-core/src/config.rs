//! Configuration file management for Escriba.
//!
//! Backend settings are read from `~/.config/escriba/config.toml`, with
//! `ESCRIBA_BACKEND_URL` / `ESCRIBA_ANON_KEY` environment overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::{EscribaError, Result};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the hosted backend platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the hosted project, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Publishable (anon) API key sent with every request.
    pub anon_key: String,
    /// Timeout applied to every remote call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Loads configuration from the default path, applying environment
    /// overrides on top.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&default_config_path()?)?;
        if let Ok(url) = std::env::var("ESCRIBA_BACKEND_URL") {
            config.base_url = url;
        }
        if let Ok(key) = std::env::var("ESCRIBA_ANON_KEY") {
            config.anon_key = key;
        }
        Ok(config)
    }

    /// Loads configuration from an explicit path (used by tests).
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(EscribaError::config(format!(
                "Configuration file not found at: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(EscribaError::config("base_url must not be empty"));
        }
        if self.anon_key.trim().is_empty() {
            return Err(EscribaError::config("anon_key must not be empty"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    /// URL of a hosted function by name.
    pub fn function_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{}", self.base_url.trim_end_matches('/'), name)
    }

    /// URL of an auth endpoint by path.
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Returns the path to the configuration file: ~/.config/escriba/config.toml
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| EscribaError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("escriba").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_config_with_default_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            "base_url = \"https://proj.supabase.co\"\nanon_key = \"anon-123\""
        )
        .unwrap();

        let config = BackendConfig::load_from(&path).unwrap();
        assert_eq!(config.base_url, "https://proj.supabase.co");
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let err = BackendConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, EscribaError::Config(_)));
    }

    #[test]
    fn empty_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = \"https://x\"\nanon_key = \"\"\n").unwrap();
        assert!(BackendConfig::load_from(&path).is_err());
    }

    #[test]
    fn builds_endpoint_urls() {
        let config = BackendConfig::new("https://proj.supabase.co/", "k");
        assert_eq!(
            config.function_url("chat-cartorial"),
            "https://proj.supabase.co/functions/v1/chat-cartorial"
        );
        assert_eq!(
            config.auth_url("token?grant_type=password"),
            "https://proj.supabase.co/auth/v1/token?grant_type=password"
        );
    }
}
