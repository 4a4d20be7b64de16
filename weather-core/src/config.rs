use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const LOCATIONS_FILE_NAME: &str = "locations.json";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// geocoding_url = "https://geocoding-api.open-meteo.com/v1/search"
/// forecast_url = "https://api.open-meteo.com/v1/forecast"
/// locations_file = "/home/me/weather/locations.json"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Open-Meteo compatible geocoding search endpoint.
    pub geocoding_url: String,

    /// Open-Meteo compatible daily forecast endpoint.
    pub forecast_url: String,

    /// Overrides the default location document path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            locations_file: None,
        }
    }
}

impl Config {
    /// Load config from an explicit path, or defaults if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the persisted location document: the override if set, else next to the config.
    pub fn locations_path(&self) -> Result<PathBuf> {
        match &self.locations_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.config_dir().join(LOCATIONS_FILE_NAME)),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-mcp", "weather-mcp")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_open_meteo() {
        let cfg = Config::default();

        assert_eq!(cfg.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(cfg.forecast_url, DEFAULT_FORECAST_URL);
        assert!(cfg.locations_file.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: Config = toml::from_str(r#"forecast_url = "http://localhost:9000/forecast""#)
            .expect("partial config must parse");

        assert_eq!(cfg.forecast_url, "http://localhost:9000/forecast");
        assert_eq!(cfg.geocoding_url, DEFAULT_GEOCODING_URL);
    }

    #[test]
    fn locations_path_prefers_override() {
        let cfg = Config {
            locations_file: Some(PathBuf::from("/tmp/weather/locations.json")),
            ..Config::default()
        };

        let path = cfg.locations_path().expect("override path");
        assert_eq!(path, PathBuf::from("/tmp/weather/locations.json"));
    }

    #[test]
    fn load_from_missing_file_returns_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("nope.toml")).expect("defaults");

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_to_creates_parent_and_reloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            geocoding_url: "http://localhost:1234/search".into(),
            locations_file: Some(dir.path().join("locations.json")),
            ..Config::default()
        };
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "geocoding_url = [").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
