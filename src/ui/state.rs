//! UI state management

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::trajectory::{MilestoneEvent, TickReport, TrajectoryError, YearFix};

const SEARCH_MAX_CHARS: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
}

/// Short message shown under the details text
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Details panel text. `body` follows the ticks; `pinned` holds the last
/// search or event selection and survives ticks until replaced or cleared.
#[derive(Resource, Debug)]
pub struct DetailsPanel {
    pub body: String,
    pub pinned: Option<String>,
    pub notice: Option<Notice>,
}

impl Default for DetailsPanel {
    fn default() -> Self {
        Self {
            body: "Voyager is moving...\nEvents update automatically.".to_string(),
            pinned: None,
            notice: None,
        }
    }
}

impl DetailsPanel {
    pub fn show_tick(&mut self, report: &TickReport) {
        let mut body = match &report.nearest {
            Some(event) => format!(
                "Year: {}\nEvent: {}\nPosition: {}",
                event.year,
                event.label,
                format_position(report.position)
            ),
            None => format!("Voyager position:\n{}", format_position(report.position)),
        };
        if let (None, Some(closest)) = (&report.nearest, &report.closest) {
            body.push_str(&format!("\nClosest milestone: {}", closest.label));
        }
        if let Some(epoch) = &report.epoch {
            body.push_str(&format!("\nDate: {}", epoch.label));
        }
        self.body = body;
    }

    pub fn show_fix(&mut self, fix: &YearFix) {
        self.pinned = Some(if fix.before == fix.after {
            format!(
                "Year: {}\nEvent: {}\nPosition: {}",
                fix.before.year,
                fix.before.label,
                format_position(fix.position)
            )
        } else {
            format!(
                "Year: {:.2} (estimated)\nBetween {} ({}) and {} ({}), {:.0}% of the way\nPosition: {}",
                fix.year,
                fix.before.label,
                fix.before.year,
                fix.after.label,
                fix.after.year,
                fix.t * 100.0,
                format_position(fix.position)
            )
        });
    }

    pub fn show_event(&mut self, event: &MilestoneEvent) {
        self.pinned = Some(format!(
            "Year: {}\nEvent: {}\nPosition: {}",
            event.year,
            event.label,
            format_position(event.position)
        ));
    }

    pub fn clear_pinned(&mut self) {
        self.pinned = None;
    }

    /// Text shown in the panel: the live position, then the pinned result
    pub fn text(&self) -> String {
        match &self.pinned {
            Some(pinned) => format!("{}\n\nSelected:\n{}", self.body, pinned),
            None => self.body.clone(),
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Info,
            text: text.into(),
        });
    }

    /// Turn a recoverable error into a user-facing warning
    pub fn show_error(&mut self, err: &TrajectoryError) {
        let text = match err {
            TrajectoryError::OutOfRange { year, min, max } => {
                format!("No data for {}. Try a year between {} and {}.", year, min, max)
            }
            TrajectoryError::InvalidInput(_) => format!("Please enter a valid year ({})", err),
            other => other.to_string(),
        };
        self.notice = Some(Notice {
            kind: NoticeKind::Warning,
            text,
        });
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}

/// Year search field
#[derive(Resource, Debug, Default)]
pub struct SearchInput {
    pub focused: bool,
    pub buffer: String,
}

impl SearchInput {
    pub fn open(&mut self) {
        self.focused = true;
        self.buffer.clear();
    }

    pub fn cancel(&mut self) {
        self.focused = false;
        self.buffer.clear();
    }

    pub fn push_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            if self.buffer.chars().count() >= SEARCH_MAX_CHARS {
                break;
            }
            self.buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Close the field and hand back what was typed
    pub fn submit(&mut self) -> String {
        self.focused = false;
        std::mem::take(&mut self.buffer)
    }
}

/// Highlighted entry in the event list
#[derive(Resource, Debug, Default)]
pub struct EventSelection {
    pub index: Option<usize>,
}

impl EventSelection {
    pub fn next(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        self.index = Some(match self.index {
            Some(i) => (i + 1) % len,
            None => 0,
        });
        self.index
    }

    pub fn previous(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        self.index = Some(match self.index {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
        self.index
    }
}

/// `(x, y, z) km` with two-decimal scientific notation
pub fn format_position(p: DVec3) -> String {
    format!("({:.2e}, {:.2e}, {:.2e}) km", p.x, p.y, p.z)
}
