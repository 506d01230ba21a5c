//! Webcam access for the scan session.
//!
//! - Device enumeration via [`list_devices`]
//! - Blocking frame capture via [`CameraSource`]
//! - Configuration via [`CameraSettings`] and [`Resolution`]

mod capture;
mod device;
mod frame_utils;
mod types;

pub use capture::CameraSource;
pub use device::list_devices;
pub use frame_utils::mirror_horizontal;
pub use types::{CameraError, CameraInfo, CameraSettings, Resolution};
