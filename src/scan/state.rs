//! Scan pointer positions, completion and pause state.

/// Which pointer(s) sweep the frame. Fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanAxis {
    /// No scanning; not accepted by the session controller
    None,
    /// Top to bottom: a horizontal line moves down the rows
    #[default]
    Vertical,
    /// Left to right: a vertical line moves across the columns
    Horizontal,
    /// Both pointers advance independently
    Both,
}

impl ScanAxis {
    pub fn scans_vertically(self) -> bool {
        matches!(self, ScanAxis::Vertical | ScanAxis::Both)
    }

    pub fn scans_horizontally(self) -> bool {
        matches!(self, ScanAxis::Horizontal | ScanAxis::Both)
    }

    /// Parse an axis name as accepted in the config file.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Self::None),
            "vertical" | "v" | "top-down" => Some(Self::Vertical),
            "horizontal" | "h" | "left-right" => Some(Self::Horizontal),
            "both" | "dual" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScanAxis::None => "none",
            ScanAxis::Vertical => "vertical",
            ScanAxis::Horizontal => "horizontal",
            ScanAxis::Both => "both",
        }
    }
}

impl std::fmt::Display for ScanAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Coarse session state derived from [`ScanState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Scanning,
    Paused,
    /// Every active axis reached the frame edge
    Completed,
}

/// Rows (vertical axis) or columns (horizontal axis) crossed during one advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub start: u32,
    pub end: u32,
}

impl Advance {
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Strips crossed by one call to [`ScanState::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvanceReport {
    pub horizontal: Option<Advance>,
    pub vertical: Option<Advance>,
    /// Set when the horizontal axis reached the right edge during this call
    pub completed_h: bool,
    /// Set when the vertical axis reached the bottom edge during this call
    pub completed_v: bool,
}

/// Scan pointers for a `width`×`height` frame.
///
/// Positions only grow, only while unpaused and unfinished, and are capped at the
/// corresponding dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanState {
    axis: ScanAxis,
    width: u32,
    height: u32,
    pub position_v: u32,
    pub position_h: u32,
    pub completed_v: bool,
    pub completed_h: bool,
    pub paused: bool,
}

impl ScanState {
    pub fn new(axis: ScanAxis, width: u32, height: u32) -> Self {
        Self {
            axis,
            width,
            height,
            position_v: 0,
            position_h: 0,
            completed_v: false,
            completed_h: false,
            paused: false,
        }
    }

    pub fn axis(&self) -> ScanAxis {
        self.axis
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Move every active, unpaused, unfinished pointer forward by `speed`.
    ///
    /// Horizontal is processed before vertical; callers rely on that order when
    /// committing strips.
    pub fn advance(&mut self, speed: u32) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        if self.paused || speed == 0 {
            return report;
        }

        if self.axis.scans_horizontally() && !self.completed_h {
            let start = self.position_h;
            self.position_h = start.saturating_add(speed).min(self.width);
            report.horizontal = Some(Advance {
                start,
                end: self.position_h,
            });
            if self.position_h >= self.width {
                self.completed_h = true;
                report.completed_h = true;
            }
        }

        if self.axis.scans_vertically() && !self.completed_v {
            let start = self.position_v;
            self.position_v = start.saturating_add(speed).min(self.height);
            report.vertical = Some(Advance {
                start,
                end: self.position_v,
            });
            if self.position_v >= self.height {
                self.completed_v = true;
                report.completed_v = true;
            }
        }

        report
    }

    /// Back to the initial state: pointers at zero, nothing completed, not paused.
    pub fn reset(&mut self) {
        self.position_v = 0;
        self.position_h = 0;
        self.completed_v = false;
        self.completed_h = false;
        self.paused = false;
    }

    /// Flip the pause flag and return the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// True when at least one active axis has completed.
    pub fn any_completed(&self) -> bool {
        (self.axis.scans_vertically() && self.completed_v)
            || (self.axis.scans_horizontally() && self.completed_h)
    }

    /// True when every active axis has completed. Always false for [`ScanAxis::None`].
    pub fn all_completed(&self) -> bool {
        let v = !self.axis.scans_vertically() || self.completed_v;
        let h = !self.axis.scans_horizontally() || self.completed_h;
        self.axis != ScanAxis::None && v && h
    }

    pub fn phase(&self) -> SessionPhase {
        if self.all_completed() {
            SessionPhase::Completed
        } else if self.paused {
            SessionPhase::Paused
        } else {
            SessionPhase::Scanning
        }
    }
}
