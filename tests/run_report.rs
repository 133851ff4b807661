// tests/run_report.rs
//
// Whole-run behavior through the runner with a fake site: failure
// containment, report assembly, and the no-send rules.

use std::path::PathBuf;

use async_trait::async_trait;
use court_watch::config::options::RunOptions;
use court_watch::config::targets::{FacilityTarget, FilterMode};
use court_watch::core::page::{CalendarCell, CalendarPage, PageError, Site};
use court_watch::progress::NullProgress;
use court_watch::report::mail::{deliver, DeliveryOutcome};
use court_watch::runner;
use court_watch::scan::MarkerSet;

struct FakePage {
    cells: Vec<CalendarCell>,
}

#[async_trait]
impl CalendarPage for FakePage {
    async fn month_label(&mut self) -> Result<Option<String>, PageError> {
        Ok(Some("November".into()))
    }
    async fn cells(&mut self) -> Result<Vec<CalendarCell>, PageError> {
        Ok(self.cells.clone())
    }
    async fn advance_month(&mut self) -> Result<bool, PageError> {
        Ok(false) // single month per facility keeps the fixtures small
    }
    async fn evening_slot_vacant(&mut self, _day: u8) -> Result<bool, PageError> {
        Ok(false)
    }
}

/// Per-facility script: either a calendar or a navigation failure.
enum Plan {
    Calendar(Vec<CalendarCell>),
    FailTimeout,
    FailFatal,
}

struct FakeSite {
    plans: Vec<Plan>,
    opened: usize,
    captures: Vec<String>,
}

impl FakeSite {
    fn new(plans: Vec<Plan>) -> Self {
        Self { plans, opened: 0, captures: Vec::new() }
    }
}

#[async_trait]
impl Site for FakeSite {
    type Page = FakePage;

    async fn open_calendar(
        &mut self,
        _target: &FacilityTarget,
    ) -> Result<(FakePage, String), PageError> {
        let plan = &self.plans[self.opened];
        self.opened += 1;
        match plan {
            Plan::Calendar(cells) => Ok((FakePage { cells: cells.clone() }, "アリーナ".into())),
            Plan::FailTimeout => Err(PageError::Timeout("calendar table".into())),
            Plan::FailFatal => Err(PageError::Fatal("session gone".into())),
        }
    }

    async fn capture(&mut self, label: &str) -> Option<PathBuf> {
        self.captures.push(label.to_string());
        Some(PathBuf::from(format!("shots/debug_{label}.png")))
    }
}

fn marked_sat(day: u8) -> CalendarCell {
    CalendarCell {
        day,
        category: "cal_sat".into(),
        icon_alt: Some("一部".into()),
        icon_src: None,
    }
}

fn facility(name: &str) -> FacilityTarget {
    FacilityTarget {
        name: name.into(),
        room_keywords: vec!["アリーナ".into()],
        filter: FilterMode::WeekendHoliday,
    }
}

fn opts() -> RunOptions {
    RunOptions { months: 1, ..Default::default() }
}

async fn patrol(site: &mut FakeSite, names: &[&str]) -> runner::RunSummary {
    let targets: Vec<_> = names.iter().map(|n| facility(n)).collect();
    runner::run(site, &opts(), &targets, &MarkerSet::default(), &mut NullProgress).await
}

#[tokio::test]
async fn empty_run_sends_nothing() {
    let mut site = FakeSite::new(vec![
        Plan::Calendar(vec![]),
        Plan::Calendar(vec![CalendarCell { day: 5, category: "cal_day".into(), ..Default::default() }]),
    ]);
    let summary = patrol(&mut site, &["A", "B"]).await;

    assert_eq!(summary.scanned, 2);
    assert!(!summary.report.should_send());
    // Even with a credential in hand, an empty report is a no-op.
    assert_eq!(deliver(&summary.report, Some("pw".into())).await, DeliveryOutcome::SkippedEmpty);
}

#[tokio::test]
async fn single_finding_formats_and_reports() {
    let mut site = FakeSite::new(vec![Plan::Calendar(vec![marked_sat(15)])]);
    let summary = patrol(&mut site, &["A"]).await;

    assert_eq!(summary.report.vacancies.len(), 1);
    let rec = &summary.report.vacancies[0];
    assert_eq!(rec.line(), "【A】November15日(一部)");

    assert!(summary.report.should_send());
    let body = summary.report.body();
    assert_eq!(body.matches("【A】November15日(一部)").count(), 1);
}

#[tokio::test]
async fn records_without_credential_still_complete() {
    let mut site = FakeSite::new(vec![Plan::Calendar(vec![marked_sat(15)])]);
    let summary = patrol(&mut site, &["A"]).await;

    let outcome = deliver(&summary.report, None).await;
    assert_eq!(outcome, DeliveryOutcome::SkippedNoCredential);
}

#[tokio::test]
async fn one_failed_facility_does_not_stop_the_rest() {
    let mut site = FakeSite::new(vec![
        Plan::FailTimeout,
        Plan::Calendar(vec![marked_sat(22)]),
    ]);
    let summary = patrol(&mut site, &["壊れた体育館", "B"]).await;

    assert!(!summary.aborted);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.scanned, 1);
    assert_eq!(summary.report.vacancies.len(), 1);
    assert_eq!(summary.report.vacancies[0].facility, "B");

    // The failed unit left a screenshot, so the report goes out with both.
    assert_eq!(site.captures, vec!["壊れた体育館"]);
    assert_eq!(summary.report.screenshots.len(), 1);
    assert!(summary.report.should_send());
    let body = summary.report.body();
    assert!(body.contains("【B】November22日(一部)"));
    assert!(body.contains("添付画像"));
}

#[tokio::test]
async fn fatal_failure_aborts_but_keeps_findings() {
    let mut site = FakeSite::new(vec![
        Plan::Calendar(vec![marked_sat(8)]),
        Plan::FailFatal,
        Plan::Calendar(vec![marked_sat(9)]), // never reached
    ]);
    let summary = patrol(&mut site, &["A", "B", "C"]).await;

    assert!(summary.aborted);
    assert_eq!(summary.scanned, 1);
    assert_eq!(site.opened, 2, "roster stops at the fatal failure");
    assert_eq!(summary.report.vacancies.len(), 1);
    assert_eq!(summary.report.vacancies[0].facility, "A");
}

#[tokio::test]
async fn traversal_order_is_preserved() {
    let mut site = FakeSite::new(vec![
        Plan::Calendar(vec![marked_sat(20), marked_sat(6)]),
        Plan::Calendar(vec![marked_sat(1)]),
    ]);
    let summary = patrol(&mut site, &["A", "B"]).await;

    let seen: Vec<_> = summary
        .report
        .vacancies
        .iter()
        .map(|r| (r.facility.clone(), r.day))
        .collect();
    assert_eq!(
        seen,
        vec![("A".into(), 20), ("A".into(), 6), ("B".into(), 1)],
        "facility order, then grid order; never sorted by date"
    );
}
