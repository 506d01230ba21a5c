//! time-warp-scan library crate.
//!
//! A scan line sweeps the webcam picture; everything behind it is frozen,
//! filtered and kept, everything ahead stays live. The composed frames are
//! recorded and can be exported as a video.
//!
//! This module exposes the components for the binary and for integration testing.

pub mod camera;
pub mod cli;
pub mod config;
pub mod display;
pub mod filters;
pub mod frame;
pub mod input;
pub mod recording;
pub mod runner;
pub mod scan;
pub mod session;
pub mod shutdown;
