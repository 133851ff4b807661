// src/report/mail.rs
//
// One best-effort submission per run. Delivery failures are logged and
// swallowed: notification is fire-and-forget, the run already succeeded.

use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, warn};

use crate::config::consts::{PASSWORD_ENV, RECIPIENT, SENDER, SMTP_HOST, SMTP_PORT, SUBJECT};

use super::RunReport;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    /// Nothing to report; not an error.
    SkippedEmpty,
    /// No app password in the environment; sending is disabled, run still ok.
    SkippedNoCredential,
    /// Submission failed; swallowed by contract.
    Failed,
}

/// App-specific password from the process environment, read at send time.
pub fn credential_from_env() -> Option<String> {
    std::env::var(PASSWORD_ENV).ok().filter(|p| !p.is_empty())
}

/// Deliver the run report. Never returns an error: every failure mode maps
/// to an outcome and the run completes regardless.
pub async fn deliver(report: &RunReport, app_password: Option<String>) -> DeliveryOutcome {
    if !report.should_send() {
        debug!("empty report; no email");
        return DeliveryOutcome::SkippedEmpty;
    }
    let Some(password) = app_password else {
        debug!("no {PASSWORD_ENV} in environment; skipping email");
        return DeliveryOutcome::SkippedNoCredential;
    };

    match submit(report, &password).await {
        Ok(()) => {
            info!(records = report.vacancies.len(), "report email sent");
            DeliveryOutcome::Sent
        }
        Err(e) => {
            warn!("report email failed: {e:#}");
            DeliveryOutcome::Failed
        }
    }
}

async fn submit(report: &RunReport, password: &str) -> Result<()> {
    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(report.body()));

    // Attach only shots that still exist; a failed capture may have left
    // the path without the file.
    let png = ContentType::parse("image/png").context("attachment content type")?;
    for path in &report.screenshots {
        let Ok(bytes) = tokio::fs::read(path).await else {
            debug!(?path, "screenshot gone; not attaching");
            continue;
        };
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| s!("capture.png"));
        parts = parts.singlepart(Attachment::new(filename).body(bytes, png.clone()));
    }

    let email = Message::builder()
        .from(SENDER.parse().context("sender address")?)
        .to(RECIPIENT.parse().context("recipient address")?)
        .subject(SUBJECT)
        .multipart(parts)
        .context("assemble message")?;

    let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(SMTP_HOST)
        .context("smtp relay")?
        .port(SMTP_PORT)
        .credentials(Credentials::new(s!(SENDER), s!(password)))
        .build();

    mailer.send(email).await.context("smtp submission")?;
    Ok(())
}
