use crate::error::ConfigError;
use crate::models::Theme;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "sunpath.yaml";

/// Application configuration loaded from sunpath.yaml
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Drawing surface geometry
    pub canvas: CanvasConfig,

    /// Where to fetch sun data for
    pub location: LocationConfig,

    /// OpenWeather API access
    pub openweather: OpenWeatherConfig,

    /// Initial theme
    pub theme: Theme,

    /// Frame loop settings
    pub animation: AnimationConfig,
}

/// CSS size and pixel density of the drawing surface
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 200.0,
            device_pixel_ratio: 1.0,
        }
    }
}

/// Coordinates plus an optional timezone override in seconds east of UTC.
///
/// An offset of 0 means "use the timezone reported by the API".
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct LocationConfig {
    pub lat: f64,
    pub lon: f64,
    pub timezone_offset: i64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        // Manila
        Self {
            lat: 14.5995,
            lon: 120.9842,
            timezone_offset: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OpenWeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openweathermap.org".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Target frames per second of the redraw loop
    pub fps: u32,

    /// Write a PNG snapshot every N frames
    pub snapshot_every: u64,

    /// Stop after this many frames (runs forever if unset)
    pub frame_limit: Option<u64>,

    /// Re-fetch sun data this often, in seconds
    pub refresh_secs: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            snapshot_every: 30,
            frame_limit: None,
            refresh_secs: 600,
        }
    }
}

impl AppConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration, falling back to defaults on any failure.
    ///
    /// With no explicit path, `sunpath.yaml` in the working directory is used
    /// if it exists. `OPENWEATHER_API_KEY` overrides the configured key.
    pub fn load(path: Option<&Path>) -> Self {
        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()));

        let mut config = match path {
            Some(path) => match Self::from_file(&path) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        lat = config.location.lat,
                        lon = config.location.lon,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), %e, "Failed to load config, using defaults");
                    Self::default()
                }
            },
            None => {
                tracing::debug!("No config file, using defaults");
                Self::default()
            }
        };

        if let Ok(key) = std::env::var("OPENWEATHER_API_KEY") {
            if !key.is_empty() {
                config.openweather.api_key = Some(key);
            }
        }

        config
    }
}
