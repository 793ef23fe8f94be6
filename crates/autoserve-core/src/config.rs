use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

use crate::api::DEFAULT_API_BASE_URL;

pub const DEFAULT_VEHICLE_ID: &str = "HERO-2024-001";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub vehicle_id: Option<String>,
    /// Per-request timeout; unset leaves the HTTP stack's default behavior
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    /// JSON file replacing the built-in demo dashboard data
    pub dashboard_file: Option<PathBuf>,

    // Deployment placeholders. Read and carried along, never validated or sent.
    pub app_id: Option<String>,
    pub auth_config: Option<String>,
    pub auth_token: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            vehicle_id: Some(DEFAULT_VEHICLE_ID.to_string()),
            request_timeout_secs: None,
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
            dashboard_file: None,
            app_id: None,
            auth_config: None,
            auth_token: None,
        }
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Load the config file, writing the defaults first if there is none yet
    pub fn load_or_init() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        if !config_path.exists() {
            let config = Self::new();
            config.save_to(&config_path)?;
            return Ok(config);
        }
        Self::load_from(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Apply `AUTOSERVE_*` environment overrides
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("AUTOSERVE_API_URL") {
            self.api_base_url = Some(url);
        }
        if let Some(vehicle) = get("AUTOSERVE_VEHICLE_ID") {
            self.vehicle_id = Some(vehicle);
        }
        if let Some(app_id) = get("AUTOSERVE_APP_ID") {
            self.app_id = Some(app_id);
        }
        if let Some(auth_config) = get("AUTOSERVE_AUTH_CONFIG") {
            self.auth_config = Some(auth_config);
        }
        if let Some(token) = get("AUTOSERVE_AUTH_TOKEN") {
            self.auth_token = Some(token);
        }
        self
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn vehicle_id(&self) -> &str {
        self.vehicle_id.as_deref().unwrap_or(DEFAULT_VEHICLE_ID)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("autoserve").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();

        assert_eq!(config, Config::new());
        assert_eq!(config.api_base_url(), "http://localhost:5000");
        assert_eq!(config.vehicle_id(), "HERO-2024-001");
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::new();
        config.vehicle_id = Some("HERO-2024-777".to_string());
        config.request_timeout_secs = Some(15);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.vehicle_id(), "HERO-2024-777");
        assert_eq!(loaded.request_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_partial_file_falls_back_per_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "api_base_url": "http://10.0.0.2:5000" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base_url(), "http://10.0.0.2:5000");
        assert_eq!(config.vehicle_id(), "HERO-2024-001");
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "vehicle_id = 3").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("AUTOSERVE_API_URL", "http://backend:8080"),
            ("AUTOSERVE_VEHICLE_ID", "HERO-2024-002"),
            ("AUTOSERVE_AUTH_TOKEN", "placeholder-token"),
            ("AUTOSERVE_APP_ID", "   "),
        ]);

        let config = Config::new().with_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_base_url(), "http://backend:8080");
        assert_eq!(config.vehicle_id(), "HERO-2024-002");
        assert_eq!(config.auth_token.as_deref(), Some("placeholder-token"));
        assert_eq!(config.app_id, None);
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = Config {
            request_timeout_secs: Some(0),
            ..Config::new()
        };
        assert_eq!(config.request_timeout(), None);
    }
}
