//! Scan-reveal core: pointer state, the committed canvas and compositing.
//!
//! - [`ScanState`] tracks where each pointer is and whether it has finished
//! - [`PersistentBuffer`] accumulates filtered strips as pointers cross them
//! - [`Compositor`] merges canvas and live frame into the displayed image

mod buffer;
mod compositor;
pub mod overlay;
mod state;

pub use buffer::PersistentBuffer;
pub use compositor::{Compositor, StatusOverlay, HELP_TEXT};
pub use state::{Advance, AdvanceReport, ScanAxis, ScanState, SessionPhase};
