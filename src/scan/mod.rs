// src/scan/mod.rs
mod calendar;
mod markers;

pub use calendar::{classify_weekday, scan_calendar, scan_months, VacancyRecord};
pub use markers::{MarkerKind, MarkerSet};
