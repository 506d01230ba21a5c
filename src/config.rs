//! Configuration file handling for time-warp-scan.
//!
//! Loads configuration from `<config dir>/time-warp-scan/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::camera::{CameraSettings, Resolution};
use crate::filters::FilterKind;
use crate::recording::DEFAULT_EXPORT_FPS;
use crate::scan::ScanAxis;
use crate::session::SessionSettings;

/// Configuration file structure for time-warp-scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub recording: RecordingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub device: u32,
    pub mirror: bool,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: 0,
            mirror: true,
            width: Resolution::VGA.width,
            height: Resolution::VGA.height,
            fps: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// "vertical", "horizontal" or "both"
    pub axis: String,
    /// Pixels per frame
    pub speed: u32,
    /// Filter active at startup
    pub filter: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            axis: ScanAxis::Vertical.name().to_string(),
            speed: 2,
            filter: FilterKind::Identity.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    pub output_dir: PathBuf,
    pub fps: f64,
    /// ffmpeg binary, looked up on PATH unless absolute
    pub ffmpeg: PathBuf,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("time_warp_videos"),
            fps: DEFAULT_EXPORT_FPS,
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Render as TOML, e.g. for `config show`.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parse and check the scan settings.
    pub fn session_settings(&self) -> Result<SessionSettings, ConfigError> {
        let axis = ScanAxis::from_str(&self.scan.axis)
            .filter(|a| *a != ScanAxis::None)
            .ok_or_else(|| ConfigError::Invalid {
                field: "scan.axis",
                message: format!(
                    "'{}' is not one of vertical, horizontal, both",
                    self.scan.axis
                ),
            })?;
        let filter = FilterKind::from_str(&self.scan.filter).ok_or_else(|| ConfigError::Invalid {
            field: "scan.filter",
            message: format!("unknown filter '{}'", self.scan.filter),
        })?;
        if self.scan.speed == 0 {
            return Err(ConfigError::Invalid {
                field: "scan.speed",
                message: "must be at least 1".to_string(),
            });
        }
        if !(self.recording.fps.is_finite() && self.recording.fps > 0.0) {
            return Err(ConfigError::Invalid {
                field: "recording.fps",
                message: format!("must be positive, got {}", self.recording.fps),
            });
        }

        Ok(SessionSettings {
            axis,
            speed: self.scan.speed,
            filter,
            export_fps: self.recording.fps,
        })
    }

    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            device_index: self.camera.device,
            resolution: Resolution {
                width: self.camera.width,
                height: self.camera.height,
            },
            fps: self.camera.fps,
            mirror: self.camera.mirror,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to write config file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("time-warp-scan").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".time-warp-scan.toml"))
}

/// Commented template written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# time-warp-scan configuration

[camera]
# Camera device index (see `time-warp-scan list-cameras`)
device = 0
# Mirror horizontally (selfie mode)
mirror = true
# Requested capture size and rate; the camera may pick the closest it supports
width = 640
height = 480
fps = 30

[scan]
# vertical, horizontal or both
axis = "vertical"
# Pixels the scan line moves per frame
speed = 2
# Filter at startup: normal, grayscale, invert, sepia, edges, mosaic
filter = "normal"

[recording]
# Directory for saved videos
output_dir = "time_warp_videos"
# Frame rate of saved videos
fps = 20.0
# ffmpeg binary used for encoding
ffmpeg = "ffmpeg"
"#;

/// Write [`DEFAULT_CONFIG`] to `path`, creating parent directories. Refuses to overwrite.
pub fn write_default(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, DEFAULT_CONFIG).map_err(write_err)
}
