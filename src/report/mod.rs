// src/report/mod.rs
pub mod mail;

use std::path::PathBuf;

use crate::config::consts::SITE_URL;
use crate::scan::VacancyRecord;

/// Everything one run accumulates for the notification email. Append-only;
/// consumed once by the reporter at run end.
#[derive(Debug, Default)]
pub struct RunReport {
    pub vacancies: Vec<VacancyRecord>,
    pub screenshots: Vec<PathBuf>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_shot(&mut self, path: PathBuf) {
        self.screenshots.push(path);
    }

    /// Nothing found and nothing broke → no email at all.
    pub fn should_send(&self) -> bool {
        !self.vacancies.is_empty() || !self.screenshots.is_empty()
    }

    /// Plain-text email body: one line per record, then the booking link or
    /// an explicit none-found sentence, then the screenshot note.
    pub fn body(&self) -> String {
        let mut body = s!("チェック結果報告です。\n\n");

        if self.vacancies.is_empty() {
            body.push_str("空きは見つかりませんでした。\n");
        } else {
            body.push_str("■空き発見:\n");
            for rec in &self.vacancies {
                body.push_str(&rec.line());
                body.push('\n');
            }
            body.push('\n');
            body.push_str(SITE_URL);
            body.push('\n');
        }

        if !self.screenshots.is_empty() {
            body.push_str("\n※一部の画面で操作に失敗しました。添付画像を確認してください。\n");
        }
        body
    }
}
