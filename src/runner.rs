// src/runner.rs
//
// The patrol loop: one facility at a time, strictly sequential, one browser
// session for the whole run. Failures stay contained to the facility that
// caused them; only a session-level failure aborts the remaining roster.

use tracing::{info, warn};

use crate::config::options::RunOptions;
use crate::config::targets::FacilityTarget;
use crate::core::page::Site;
use crate::progress::Progress;
use crate::report::RunReport;
use crate::scan::{scan_months, MarkerSet};

/// What one run produced. The report is handed to the mail step exactly
/// once, by the caller.
pub struct RunSummary {
    pub report: RunReport,
    pub scanned: usize,
    pub skipped: usize,
    /// A session-level failure cut the roster short.
    pub aborted: bool,
}

pub async fn run<S: Site>(
    site: &mut S,
    opts: &RunOptions,
    targets: &[FacilityTarget],
    markers: &MarkerSet,
    progress: &mut dyn Progress,
) -> RunSummary {
    let mut summary = RunSummary {
        report: RunReport::new(),
        scanned: 0,
        skipped: 0,
        aborted: false,
    };

    progress.begin(targets.len());

    for target in targets {
        progress.log(&format!(">>> {} をチェック中...", target.name));

        let (mut page, room) = match site.open_calendar(target).await {
            Ok(opened) => opened,
            Err(e) if e.is_fatal() => {
                warn!(facility = %target.name, %e, "session failure; aborting run");
                if let Some(shot) = site.capture(&target.name).await {
                    summary.report.push_shot(shot);
                }
                summary.aborted = true;
                break;
            }
            Err(e) => {
                warn!(facility = %target.name, %e, "could not reach calendar; skipping");
                progress.target_failed(&target.name);
                if let Some(shot) = site.capture(&target.name).await {
                    summary.report.push_shot(shot);
                }
                summary.skipped += 1;
                continue;
            }
        };

        // Records found before a mid-scan failure are kept: the accumulator
        // is the report itself.
        let before = summary.report.vacancies.len();
        match scan_months(
            &mut page,
            target,
            &room,
            markers,
            opts.months,
            &mut summary.report.vacancies,
        )
        .await
        {
            Ok(()) => {
                let found = summary.report.vacancies.len() - before;
                info!(facility = %target.name, %room, found, "facility scanned");
                summary.scanned += 1;
                progress.target_done(&target.name, found);
            }
            Err(e) if e.is_fatal() => {
                warn!(facility = %target.name, %e, "session failure mid-scan; aborting run");
                if let Some(shot) = site.capture(&target.name).await {
                    summary.report.push_shot(shot);
                }
                summary.aborted = true;
                break;
            }
            Err(e) => {
                warn!(facility = %target.name, %e, "scan abandoned");
                progress.target_failed(&target.name);
                if let Some(shot) = site.capture(&target.name).await {
                    summary.report.push_shot(shot);
                }
                summary.skipped += 1;
            }
        }
    }

    progress.finish();
    summary
}
