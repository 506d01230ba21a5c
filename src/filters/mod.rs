//! Per-slice pixel filters applied to freshly scanned strips before they are committed.
//!
//! Every filter is a pure function from a frame region to a region of the same
//! dimensions. Selection goes through [`FilterKind`] and a fixed lookup table
//! ([`FILTERS`]) rather than trait objects:
//!
//! 1. **Normal** - pixels unchanged
//! 2. **Grayscale** - BT.601 luma replicated to three channels
//! 3. **Invert** - `255 - v` per channel
//! 4. **Sepia** - fixed colour matrix, clamped
//! 5. **Edges** - Canny-style edge map with a (100, 200) threshold pair
//! 6. **Mosaic** - block pixelation at one tenth resolution
//!
//! Degenerate input (zero width or height) is returned unchanged by every filter.

mod color;
mod edges;
mod mosaic;

pub use color::{grayscale, identity, invert, luma, sepia, SEPIA_MATRIX};
pub use edges::{edge_detect, EDGE_HIGH_THRESHOLD, EDGE_LOW_THRESHOLD};
pub use mosaic::{mosaic, MOSAIC_FACTOR};

use crate::frame::Frame;

/// A pure per-slice transform.
pub type FilterFn = fn(&Frame) -> Frame;

/// Selectable filter, cycled at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    /// No filtering
    #[default]
    Identity,
    Grayscale,
    Invert,
    Sepia,
    EdgeDetect,
    Mosaic,
}

/// Dispatch table, indexed by [`FilterKind::index`].
pub const FILTERS: [(FilterKind, FilterFn); 6] = [
    (FilterKind::Identity, identity),
    (FilterKind::Grayscale, grayscale),
    (FilterKind::Invert, invert),
    (FilterKind::Sepia, sepia),
    (FilterKind::EdgeDetect, edge_detect),
    (FilterKind::Mosaic, mosaic),
];

impl FilterKind {
    /// Number of selectable filters.
    pub const COUNT: usize = FILTERS.len();

    /// Position of this filter in the cycle order.
    pub fn index(self) -> usize {
        match self {
            FilterKind::Identity => 0,
            FilterKind::Grayscale => 1,
            FilterKind::Invert => 2,
            FilterKind::Sepia => 3,
            FilterKind::EdgeDetect => 4,
            FilterKind::Mosaic => 5,
        }
    }

    /// Filter at `index` modulo the number of filters.
    pub fn from_index(index: usize) -> Self {
        FILTERS[index % Self::COUNT].0
    }

    /// Cycle to the next filter.
    ///
    /// Order: Normal -> Grayscale -> Invert -> Sepia -> Edges -> Mosaic -> Normal
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Display name used by the on-screen overlay.
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Identity => "NORMAL",
            FilterKind::Grayscale => "GRAYSCALE",
            FilterKind::Invert => "INVERT",
            FilterKind::Sepia => "SEPIA",
            FilterKind::EdgeDetect => "EDGES",
            FilterKind::Mosaic => "MOSAIC",
        }
    }

    /// Parse a filter name as accepted in the config file.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" | "none" | "identity" => Some(Self::Identity),
            "grayscale" | "greyscale" | "gray" | "bw" => Some(Self::Grayscale),
            "invert" | "negative" => Some(Self::Invert),
            "sepia" => Some(Self::Sepia),
            "edges" | "edge" | "edge_detect" | "edge-detect" => Some(Self::EdgeDetect),
            "mosaic" | "pixelate" => Some(Self::Mosaic),
            _ => None,
        }
    }

    /// The transform for this filter.
    pub fn transform(self) -> FilterFn {
        FILTERS[self.index()].1
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name().to_lowercase())
    }
}

/// Apply `kind` to a slice. Never fails; zero-area slices come back unchanged.
pub fn apply(slice: &Frame, kind: FilterKind) -> Frame {
    if slice.is_empty() {
        return slice.clone();
    }
    (kind.transform())(slice)
}
