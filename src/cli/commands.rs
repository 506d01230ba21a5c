//! Subcommand handlers for list-cameras and config actions.

use std::path::Path;

use super::args::ConfigAction;
use crate::camera::{self, CameraError};
use crate::config::{self, Config, ConfigError};

/// List available cameras and print them to stdout.
pub fn list_cameras() -> Result<(), CameraError> {
    let devices = camera::list_devices()?;
    if devices.is_empty() {
        println!("No cameras found.");
        println!();
        println!("Make sure your camera is connected and permissions are granted.");
        println!("On macOS, grant access in System Settings > Privacy & Security > Camera.");
    } else {
        println!("Available cameras:");
        for device in devices {
            println!("  {}", device);
        }
        println!();
        println!("Use --camera <index> to select a camera.");
    }
    Ok(())
}

/// Handle config subcommand actions.
///
/// `effective` is the loaded config with command-line flags applied.
pub fn handle_config_action(
    action: ConfigAction,
    config_path: &Path,
    effective: &Config,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Show => {
            println!("# Effective configuration");
            print!("{}", effective.to_toml()?);
            println!();
            if config_path.exists() {
                println!("# Config file: {} (exists)", config_path.display());
            } else {
                println!("# Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            config::write_default(config_path)?;
            println!("Created config file: {}", config_path.display());
        }
    }
    Ok(())
}
