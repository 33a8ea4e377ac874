//! Layered settings: built-in defaults, then an optional config file, then
//! `GAMBINO__*` environment variables (`GAMBINO__BACKEND__BASE_URL=...`).

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::api::config::ApiConfig;
use crate::client::BackendConfig;
use crate::watcher::WatcherConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard";
const ENV_PREFIX: &str = "GAMBINO";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ApiConfig,
    pub backend: BackendConfig,
    pub watcher: WatcherConfig,
    /// Directory the log files are written to
    pub log_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ApiConfig::default(),
            backend: BackendConfig::default(),
            watcher: WatcherConfig::default(),
            log_dir: "logs".to_string(),
        }
    }
}

impl Settings {
    /// `path` is a file stem; any format the config crate knows is accepted
    /// (`dashboard.toml`, `dashboard.yaml`, ...). A missing file is fine.
    pub fn load(path: &str) -> Result<Self> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to read settings from {}", path))?
            .try_deserialize()
            .context("Invalid settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = Settings::load("does/not/exist/dashboard").unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.watcher.interval_secs, 60);
        assert_eq!(settings.log_dir, "logs");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("gambino_settings_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dashboard.toml");
        std::fs::write(
            &path,
            "log_dir = \"/var/log/gambino\"\n\n[server]\nport = 9090\n\n[backend]\nbase_url = \"https://api.gambino.test\"\n",
        )
        .unwrap();

        let stem = dir.join("dashboard");
        let settings = Settings::load(stem.to_str().unwrap()).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.backend.base_url, "https://api.gambino.test");
        assert_eq!(settings.log_dir, "/var/log/gambino");
        std::fs::remove_dir_all(&dir).ok();
    }
}
