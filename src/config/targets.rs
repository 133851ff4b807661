// src/config/targets.rs
//
// The patrol roster. Fixed at start, immutable during a run; the CLI can
// narrow it by name substring but never add to it.

/// Which days of a marked calendar are reportable for a facility.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterMode {
    /// Every marked day-cell records.
    AllDays,
    /// Saturday/Sunday/holiday cells record; a marked weekday only records
    /// when the evening-slot drill-down confirms it.
    WeekendHoliday,
}

#[derive(Clone, Debug)]
pub struct FacilityTarget {
    pub name: String,
    /// Room link keywords, tried in order ("競技場|アリーナ" style alternatives).
    pub room_keywords: Vec<String>,
    pub filter: FilterMode,
}

impl FacilityTarget {
    fn new(name: &str, rooms: &str, filter: FilterMode) -> Self {
        Self {
            name: s!(name),
            room_keywords: rooms.split('|').map(String::from).collect(),
            filter,
        }
    }
}

/// The compiled-in facility roster, in traversal order.
pub fn default_targets() -> Vec<FacilityTarget> {
    use FilterMode::WeekendHoliday;
    vec![
        FacilityTarget::new("三橋総合公園", "体育室Ａ", WeekendHoliday),
        FacilityTarget::new("大宮体育館", "アリーナ", WeekendHoliday),
        FacilityTarget::new("浦和西体育館", "競技場|アリーナ", WeekendHoliday),
        FacilityTarget::new("与野体育館", "競技場|アリーナ", WeekendHoliday),
    ]
}
