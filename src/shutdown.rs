//! Ctrl+C handling.
//!
//! The handler only raises a flag; the session loop checks it once per tick
//! and leaves through the normal shutdown path.

use std::sync::atomic::{AtomicBool, Ordering};

static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// The flag raised by the Ctrl+C handler.
pub fn flag() -> &'static AtomicBool {
    &CTRLC_RECEIVED
}

/// Set up the Ctrl+C handler.
///
/// This should be called once at program startup.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
        eprintln!("\nReceived Ctrl+C, shutting down...");
    })
}
