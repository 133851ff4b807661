// src/scan/markers.rs

use crate::core::page::CalendarCell;

/// What a vacancy icon means once recognized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerKind {
    /// Whole day bookable ("空き", "予約可").
    Full,
    /// Some slots left ("一部").
    Partial,
}

impl MarkerKind {
    /// Canonical label used in report lines, whatever phrase matched.
    pub fn label(self) -> &'static str {
        match self {
            MarkerKind::Full => "空き",
            MarkerKind::Partial => "一部",
        }
    }
}

/// The marker vocabulary: ordered phrase → kind pairs matched against a
/// cell's icon annotations. The site has reworded these icons before, so
/// the set is data, not a closed enum.
#[derive(Clone, Debug)]
pub struct MarkerSet {
    entries: Vec<(String, MarkerKind)>,
}

impl Default for MarkerSet {
    fn default() -> Self {
        // "一部" first: composite alts like "一部空き" must stay Partial.
        Self::new(&[
            ("一部", MarkerKind::Partial),
            ("空き", MarkerKind::Full),
            ("予約可", MarkerKind::Full),
        ])
    }
}

impl MarkerSet {
    pub fn new(entries: &[(&str, MarkerKind)]) -> Self {
        Self {
            entries: entries.iter().map(|(p, k)| (s!(*p), *k)).collect(),
        }
    }

    /// First phrase that occurs in `text` wins.
    pub fn classify_text(&self, text: &str) -> Option<MarkerKind> {
        self.entries
            .iter()
            .find(|(phrase, _)| text.contains(phrase.as_str()))
            .map(|(_, kind)| *kind)
    }

    /// Classify a cell: icon alt text is authoritative, the image source
    /// identifier is the fallback for later site revisions that dropped alts.
    pub fn classify(&self, cell: &CalendarCell) -> Option<MarkerKind> {
        if let Some(alt) = cell.icon_alt.as_deref() {
            if let Some(kind) = self.classify_text(alt) {
                return Some(kind);
            }
        }
        cell.icon_src
            .as_deref()
            .and_then(|src| self.classify_text(src))
    }
}
