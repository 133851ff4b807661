// src/cli.rs
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use tracing::info;

use crate::config::consts::MAX_MONTHS;
use crate::config::options::RunOptions;
use crate::config::targets::{default_targets, FacilityTarget};
use crate::navigator::SiteSession;
use crate::progress::Progress;
use crate::report::mail::{self, DeliveryOutcome};
use crate::runner;
use crate::scan::MarkerSet;

/// Prints the patrol as it happens.
struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        println!("巡回開始: {total} 施設");
    }
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
    fn target_done(&mut self, name: &str, found: usize) {
        println!("  {name}: 空き {found} 件");
    }
    fn target_failed(&mut self, name: &str) {
        println!("  ! {name} をスキップしました");
    }
    fn finish(&mut self) {
        println!("巡回終了");
    }
}

pub async fn run() -> Result<()> {
    let opts = parse_args(env::args().skip(1))?;

    let targets: Vec<FacilityTarget> = default_targets()
        .into_iter()
        .filter(|t| opts.wants(&t.name))
        .collect();

    if opts.list_targets {
        for t in &targets {
            println!("{}\t{}\t{:?}", t.name, t.room_keywords.join("|"), t.filter);
        }
        return Ok(());
    }
    if targets.is_empty() {
        bail!("no facilities match the --facility filter");
    }

    let markers = MarkerSet::default();
    let mut site = SiteSession::connect(&opts, markers.clone()).await?;
    let mut progress = ConsoleProgress;
    let summary = runner::run(&mut site, &opts, &targets, &markers, &mut progress).await;
    site.close().await;

    for rec in &summary.report.vacancies {
        println!("{}", rec.line());
    }

    if opts.dry_run {
        info!("dry run; email skipped");
    } else {
        // Send whatever was accumulated, even after an aborted run.
        match mail::deliver(&summary.report, mail::credential_from_env()).await {
            DeliveryOutcome::Sent => println!("報告メールを送信しました"),
            DeliveryOutcome::SkippedEmpty => println!("報告事項なし(メール省略)"),
            DeliveryOutcome::SkippedNoCredential => println!("パスワード未設定のためメール省略"),
            DeliveryOutcome::Failed => println!("メール送信に失敗しました"),
        }
    }

    if summary.aborted {
        bail!(
            "browser session failed mid-run; {} of {} facilities scanned",
            summary.scanned,
            targets.len()
        );
    }
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<RunOptions> {
    let mut opts = RunOptions::default();
    while let Some(a) = args.next() {
        match a.as_str() {
            "-m" | "--months" => {
                let v: usize = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --months"))?
                    .parse()?;
                if !(1..=MAX_MONTHS).contains(&v) {
                    bail!("--months out of range (1..={MAX_MONTHS})");
                }
                opts.months = v;
            }
            "-f" | "--facility" => {
                opts.facility_filter
                    .push(args.next().ok_or_else(|| anyhow!("missing value for --facility"))?);
            }
            "--list-targets" => opts.list_targets = true,
            "-n" | "--dry-run" => opts.dry_run = true,
            "--webdriver" => {
                opts.webdriver_url =
                    args.next().ok_or_else(|| anyhow!("missing value for --webdriver"))?;
            }
            "--no-headless" => opts.headless = false,
            "--shots" => {
                opts.shot_dir = PathBuf::from(
                    args.next().ok_or_else(|| anyhow!("missing value for --shots"))?,
                );
            }
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => bail!("unknown arg: {a} (try --help)"),
        }
    }
    Ok(opts)
}
