// src/core/page.rs
//
// The seam between the scan logic and whatever is actually rendering pages.
// Scan code only ever sees these traits; the live WebDriver implementation
// lives in navigator::, fakes live in the tests.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::targets::FacilityTarget;

/// Page-layer failures, sorted by how the runner reacts to them.
#[derive(Debug, Error)]
pub enum PageError {
    /// Expected and frequent: a link/icon/table the heuristics looked for
    /// isn't in the current markup. Abandons the unit, run continues.
    #[error("not found: {0}")]
    NotFound(String),

    /// The element never showed up within the bounded wait. Treated as
    /// "no data for this unit".
    #[error("timed out waiting for {0}")]
    Timeout(String),

    /// Browser session is gone or misbehaving; aborts the remaining roster.
    #[error("session failure: {0}")]
    Fatal(String),
}

impl PageError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, PageError::Fatal(_))
    }
}

/// One day-cell as read off the rendered monthly grid. Transient: lives for
/// a single page scan, never persisted.
#[derive(Clone, Debug, Default)]
pub struct CalendarCell {
    pub day: u8,
    /// Raw style/category attribute of the cell ("cal_sat" etc.).
    pub category: String,
    /// Descriptive text of the contained status icon, if any.
    pub icon_alt: Option<String>,
    /// Source identifier of that icon; fallback when alt text is absent.
    pub icon_src: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeekdayClass {
    Weekday,
    Saturday,
    Sunday,
    Holiday,
}

impl WeekdayClass {
    /// Sat/Sun/holiday cells record without the evening drill-down.
    pub fn reportable_directly(self) -> bool {
        !matches!(self, WeekdayClass::Weekday)
    }
}

/// A rendered monthly calendar view, positioned by the navigator.
#[async_trait]
pub trait CalendarPage: Send {
    /// Normalized month heading, `None` when the page carries none.
    async fn month_label(&mut self) -> Result<Option<String>, PageError>;

    /// Every day-cell of the grid, in document order.
    async fn cells(&mut self) -> Result<Vec<CalendarCell>, PageError>;

    /// Click through to the next month. `Ok(false)` when the control is
    /// absent (end of the bookable range) — not an error.
    async fn advance_month(&mut self) -> Result<bool, PageError>;

    /// Drill into the day's detail view and report whether the 19:00 slot
    /// carries a vacancy marker. Implementations must restore the calendar
    /// view before returning, on success and on failure.
    async fn evening_slot_vacant(&mut self, day: u8) -> Result<bool, PageError>;
}

/// The navigator collaborator: positions the browser on calendar views and
/// captures diagnostics. One instance per run.
#[async_trait]
pub trait Site: Send {
    type Page: CalendarPage;

    /// Walk the site menus to the target's room calendar. Returns the page
    /// plus the room label that actually matched.
    async fn open_calendar(&mut self, target: &FacilityTarget)
        -> Result<(Self::Page, String), PageError>;

    /// Best-effort screenshot of whatever is on screen; `None` when capture
    /// itself failed (already logged).
    async fn capture(&mut self, label: &str) -> Option<PathBuf>;
}
