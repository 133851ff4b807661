// src/scan/calendar.rs
//
// Converts rendered monthly calendar views into vacancy records. Works
// entirely through core::page traits; nothing here knows about markup or
// WebDriver. Records are appended in document order — callers get
// facility-traversal order, then month order, then grid order.

use tracing::warn;

use crate::config::consts::EVENING_SLOT_LABEL;
use crate::config::targets::{FacilityTarget, FilterMode};
use crate::core::page::{CalendarPage, PageError, WeekdayClass};
use crate::core::sanitize::compact_label;

use super::markers::{MarkerKind, MarkerSet};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VacancyRecord {
    pub facility: String,
    pub room: String,
    pub month: String,
    pub day: u8,
    pub kind: MarkerKind,
    /// "19-21時" when the record came from the weekday evening drill-down.
    pub slot: Option<String>,
}

impl VacancyRecord {
    /// One report line: 【施設】月ラベル日(マーカー).
    pub fn line(&self) -> String {
        match &self.slot {
            Some(slot) => format!(
                "【{}】{}{}日({} {})",
                self.facility, self.month, self.day, self.kind.label(), slot
            ),
            None => format!(
                "【{}】{}{}日({})",
                self.facility, self.month, self.day, self.kind.label()
            ),
        }
    }
}

/// Weekday classification from the cell's style/category attribute.
pub fn classify_weekday(category: &str) -> WeekdayClass {
    let cat = category.to_ascii_lowercase();
    if cat.contains("holiday") || cat.contains("祝") {
        WeekdayClass::Holiday
    } else if cat.contains("sat") || cat.contains("土") {
        WeekdayClass::Saturday
    } else if cat.contains("sun") || cat.contains("日曜") {
        WeekdayClass::Sunday
    } else {
        WeekdayClass::Weekday
    }
}

/// Scan the currently rendered month. Marked cells pass through the
/// facility's filter rule; weekday cells under WeekendHoliday go through the
/// evening drill-down, whose failure drops the cell but never the month.
pub async fn scan_calendar<P: CalendarPage>(
    page: &mut P,
    target: &FacilityTarget,
    room: &str,
    markers: &MarkerSet,
) -> Result<Vec<VacancyRecord>, PageError> {
    let month = match page.month_label().await? {
        Some(raw) => compact_label(&raw),
        None => s!(), // heading missing is not worth failing the scan
    };

    let mut out = Vec::new();
    for cell in page.cells().await? {
        if cell.day == 0 {
            continue; // grid padding, not a day
        }
        let Some(kind) = markers.classify(&cell) else { continue };

        let record = |slot: Option<String>| VacancyRecord {
            facility: target.name.clone(),
            room: s!(room),
            month: month.clone(),
            day: cell.day,
            kind,
            slot,
        };

        match target.filter {
            FilterMode::AllDays => out.push(record(None)),
            FilterMode::WeekendHoliday => {
                if classify_weekday(&cell.category).reportable_directly() {
                    out.push(record(None));
                } else {
                    match page.evening_slot_vacant(cell.day).await {
                        Ok(true) => out.push(record(Some(s!(EVENING_SLOT_LABEL)))),
                        Ok(false) => {}
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => {
                            warn!(day = cell.day, %e, "evening drill-down failed; dropping cell");
                        }
                    }
                }
            }
        }
    }
    Ok(out)
}

/// Scan up to `months` consecutive calendar pages, appending into `acc` so
/// already-found records survive a later month's failure. Stops early when
/// the next-month control is gone.
pub async fn scan_months<P: CalendarPage>(
    page: &mut P,
    target: &FacilityTarget,
    room: &str,
    markers: &MarkerSet,
    months: usize,
    acc: &mut Vec<VacancyRecord>,
) -> Result<(), PageError> {
    for i in 0..months {
        acc.extend(scan_calendar(page, target, room, markers).await?);
        if i + 1 < months && !page.advance_month().await? {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_classes_from_category_attr() {
        assert_eq!(classify_weekday("cal_sat"), WeekdayClass::Saturday);
        assert_eq!(classify_weekday("cal_SUN"), WeekdayClass::Sunday);
        assert_eq!(classify_weekday("cal_holiday"), WeekdayClass::Holiday);
        assert_eq!(classify_weekday("祝日"), WeekdayClass::Holiday);
        assert_eq!(classify_weekday("cal_day plain"), WeekdayClass::Weekday);
        assert_eq!(classify_weekday(""), WeekdayClass::Weekday);
    }

    #[test]
    fn report_line_shapes() {
        let rec = VacancyRecord {
            facility: s!("A"),
            room: s!("アリーナ"),
            month: s!("November"),
            day: 15,
            kind: MarkerKind::Partial,
            slot: None,
        };
        assert_eq!(rec.line(), "【A】November15日(一部)");

        let evening = VacancyRecord { slot: Some(s!("19-21時")), kind: MarkerKind::Full, ..rec };
        assert_eq!(evening.line(), "【A】November15日(空き 19-21時)");
    }
}
