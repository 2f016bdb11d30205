use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::Location;

/// Geocoding language preference when none is configured.
pub const DEFAULT_LANGUAGE: &str = "de";

/// Quiet period before a typed query fires, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Start-up city shown before the user searches for anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityConfig {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<CityConfig> for Location {
    fn from(city: CityConfig) -> Self {
        Location {
            id: city.id,
            name: city.name,
            country: city.country,
            latitude: city.latitude,
            longitude: city.longitude,
        }
    }
}

impl From<Location> for CityConfig {
    fn from(location: Location) -> Self {
        CityConfig {
            id: location.id,
            name: location.name,
            country: location.country,
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Language code sent to the geocoder, e.g. "de".
    pub language: Option<String>,

    /// Override for the search quiet period.
    pub debounce_ms: Option<u64>,

    /// Example TOML:
    /// [default_city]
    /// name = "Chemnitz"
    /// ...
    pub default_city: Option<CityConfig>,
}

impl Config {
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)
    }

    /// Configured start-up city, falling back to the built-in default.
    pub fn default_city(&self) -> Location {
        self.default_city
            .clone()
            .map_or_else(builtin_city, Location::from)
    }

    pub fn set_default_city(&mut self, location: Location) {
        self.default_city = Some(CityConfig::from(location));
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "surfweather", "surfweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// The original application's hardcoded start-up city.
fn builtin_city() -> Location {
    Location {
        id: 2940132,
        name: "Chemnitz".to_string(),
        country: "Deutschland".to_string(),
        latitude: 50.8357,
        longitude: 12.92922,
    }
}
