use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::observe::DEFAULT_ELEVATION_M;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid duration in config: {0}")]
    Duration(#[from] humantime::DurationError),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub station: StationConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    /// Height above sea level; shifts the Moon's topocentric place.
    #[serde(default = "default_elevation_m")]
    pub elevation_m: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_longitude() -> f64 {
    127.0
}

fn default_latitude() -> f64 {
    37.5
}

fn default_elevation_m() -> f64 {
    DEFAULT_ELEVATION_M
}

fn default_timezone() -> String {
    "Asia/Seoul".to_string()
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            longitude: default_longitude(),
            latitude: default_latitude(),
            elevation_m: default_elevation_m(),
            timezone: default_timezone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_min_alt")]
    pub min_alt: f64,
    #[serde(default = "default_min_alt_planet")]
    pub min_alt_planet: f64,
    #[serde(default = "default_duration_hours")]
    pub duration_hours: f64,
}

fn default_min_alt() -> f64 {
    30.0
}

fn default_min_alt_planet() -> f64 {
    25.0
}

fn default_duration_hours() -> f64 {
    2.0
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_alt: default_min_alt(),
            min_alt_planet: default_min_alt_planet(),
            duration_hours: default_duration_hours(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Catalog with resolved RA/DEC.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
    /// Catalog as scraped, input of `resolve`.
    #[serde(default = "default_raw_catalog")]
    pub raw_catalog: PathBuf,
    #[serde(default = "default_figs")]
    pub figs: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_catalog() -> PathBuf {
    PathBuf::from("amastro_catalog_radec.csv")
}

fn default_raw_catalog() -> PathBuf {
    PathBuf::from("amastro_catalog.csv")
}

fn default_figs() -> PathBuf {
    PathBuf::from("figs")
}

fn default_output() -> PathBuf {
    PathBuf::from("output.html")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            raw_catalog: default_raw_catalog(),
            figs: default_figs(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// humantime string, e.g. "30s".
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Pause between consecutive image downloads.
    #[serde(default = "default_download_delay")]
    pub download_delay: String,
}

fn default_timeout() -> String {
    "30s".to_string()
}

fn default_download_delay() -> String {
    "800ms".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            download_delay: default_download_delay(),
        }
    }
}

impl NetworkConfig {
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        Ok(humantime::parse_duration(self.timeout.trim())?)
    }

    pub fn download_delay(&self) -> Result<Duration, ConfigError> {
        Ok(humantime::parse_duration(self.download_delay.trim())?)
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Read `path` if given, otherwise use built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                log::info!("Reading configuration from {}", path.display());
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }
}
