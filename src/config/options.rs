// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;

/// One run's knobs. Built by CLI parsing; read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Calendar pages to scan per room (current month + next ones).
    pub months: usize,
    /// Facility-name substrings; empty means the whole roster.
    pub facility_filter: Vec<String>,
    pub list_targets: bool,
    /// Scan and print, skip the email.
    pub dry_run: bool,
    pub webdriver_url: String,
    pub headless: bool,
    pub shot_dir: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            months: DEFAULT_MONTHS,
            facility_filter: Vec::new(),
            list_targets: false,
            dry_run: false,
            webdriver_url: s!(WEBDRIVER_URL),
            headless: true,
            shot_dir: PathBuf::from(DEFAULT_SHOT_DIR),
        }
    }
}

impl RunOptions {
    /// Does the roster entry survive the CLI facility filter?
    pub fn wants(&self, facility_name: &str) -> bool {
        self.facility_filter.is_empty()
            || self.facility_filter.iter().any(|f| facility_name.contains(f.as_str()))
    }
}
