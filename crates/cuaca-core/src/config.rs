use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// The fixed location the dashboard reports on
    #[serde(default)]
    pub location: LocationConfig,

    /// Forecast fetching and display settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Offline shell cache settings
    #[serde(default)]
    pub shell: ShellConfig,
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// Display name shown in the dashboard header
    pub label: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: -6.2349,
            longitude: 106.9896,
            label: "Kota Bekasi".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the forecast API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Temperature unit preference
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    /// How long a cached forecast snapshot stays displayable, in minutes
    #[serde(default = "default_snapshot_max_age_minutes")]
    pub snapshot_max_age_minutes: u64,
}

fn default_endpoint() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_snapshot_max_age_minutes() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            temperature_unit: TemperatureUnit::default(),
            snapshot_max_age_minutes: default_snapshot_max_age_minutes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Version tag of the offline shell cache; bumping it invalidates
    /// previously stored responses on activation
    #[serde(default = "default_cache_version")]
    pub cache_version: String,

    /// Scope the `%BASE_URL%` asset-path token resolves against
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Shell assets to precache on install
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,
}

fn default_cache_version() -> String {
    "cuaca-shell-v2".to_string()
}

fn default_scope() -> String {
    "/".to_string()
}

fn default_assets() -> Vec<String> {
    vec![
        "%BASE_URL%".to_string(),
        "%BASE_URL%index.html".to_string(),
        "%BASE_URL%manifest.webmanifest".to_string(),
        "%BASE_URL%favicon.svg".to_string(),
    ]
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            cache_version: default_cache_version(),
            scope: default_scope(),
            assets: default_assets(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cuaca");

        Self {
            config_dir,
            location: LocationConfig::default(),
            weather: WeatherConfig::default(),
            shell: ShellConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path (used by tests)
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| ConfigError::NotFound(format!("{}: {}", config_path.display(), e)))?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Persist the configuration to its default path
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Invalid(format!("create {}: {}", parent.display(), e)))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        std::fs::write(config_path, contents)
            .map_err(|e| ConfigError::Invalid(format!("write {}: {}", config_path.display(), e)))?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("no config directory on this platform".into()))?;
        Ok(dir.join("cuaca").join("config.toml"))
    }

    /// Snapshot freshness window as a `Duration`
    pub fn snapshot_max_age(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.weather.snapshot_max_age_minutes * 60)
    }
}
