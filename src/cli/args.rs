//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{Axis, Filter};
use crate::config::Config;
use crate::filters::FilterKind;
use crate::scan::ScanAxis;

/// Parse and validate scan speed (1-100 px per frame)
fn parse_speed(s: &str) -> Result<u32, String> {
    let speed: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid speed", s))?;
    if !(1..=100).contains(&speed) {
        return Err(format!(
            "Speed must be between 1 and 100 pixels per frame, got {}",
            speed
        ));
    }
    Ok(speed)
}

/// Slit-scan webcam effect: a moving line freezes the picture strip by strip
#[derive(Parser, Debug)]
#[command(name = "time-warp-scan")]
#[command(version, about = "Time warp scan webcam effect", long_about = None)]
#[command(after_help = "KEYS:
    ESC    quit
    SPACE  pause / resume
    R      reset the scan
    S      save the video (after a scan completes)
    F      next filter")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Scan direction
    #[arg(long, short)]
    pub axis: Option<Axis>,

    /// Pixels the scan line moves per frame
    #[arg(long, value_parser = parse_speed)]
    pub speed: Option<u32>,

    /// Filter applied to frozen strips at startup
    #[arg(long, short)]
    pub filter: Option<Filter>,

    /// Camera device index (from list-cameras)
    #[arg(long)]
    pub camera: Option<u32>,

    /// Do not mirror the camera image
    #[arg(long)]
    pub no_mirror: bool,

    /// Directory for saved videos
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available cameras
    ListCameras,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration (file plus flags)
    Show,
    /// Create default config file
    Init,
}

impl Args {
    /// Overlay the flags that were given on top of `config`.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(axis) = self.axis {
            config.scan.axis = ScanAxis::from(axis).name().to_string();
        }
        if let Some(speed) = self.speed {
            config.scan.speed = speed;
        }
        if let Some(filter) = self.filter {
            config.scan.filter = FilterKind::from(filter).to_string();
        }
        if let Some(camera) = self.camera {
            config.camera.device = camera;
        }
        if self.no_mirror {
            config.camera.mirror = false;
        }
        if let Some(dir) = &self.output_dir {
            config.recording.output_dir = dir.clone();
        }
    }
}
