// src/navigator/session.rs
//
// Drives the reservation site through its fixed menu sequence and exposes
// the rendered calendar as core::page::CalendarPage. All markup knowledge
// of the live site lives in this file and query.rs.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thirtyfour::{By, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver, WebElement};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::consts::{
    ELEMENT_WAIT_SECS, EVENING_SLOT, MENU_WAIT_SECS, PAGE_LOAD_SECS, POLL_MS, SETTLE_MS,
    SHOT_PREFIX, SITE_URL, USER_AGENT, WINDOW_SIZE,
};
use crate::config::options::RunOptions;
use crate::config::targets::FacilityTarget;
use crate::core::page::{CalendarCell, CalendarPage, PageError, Site};
use crate::core::sanitize::sanitize_label;
use crate::scan::MarkerSet;

use super::query::{fatal, recoverable, PageQuery};

const CAL_TABLE: &str = "table.cal_table";

pub struct SiteSession {
    driver: WebDriver,
    shot_dir: PathBuf,
    markers: MarkerSet,
    shot_seq: usize,
}

impl SiteSession {
    /// Connect to the WebDriver endpoint and prepare the browser profile
    /// (headless, desktop user agent, fixed window). Setup failures are
    /// fatal to the run — there is nothing to scan without a browser.
    pub async fn connect(opts: &RunOptions, markers: MarkerSet) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if opts.headless {
            caps.add_arg("--headless=new").context("caps: headless")?;
        }
        caps.add_arg(&format!("--user-agent={USER_AGENT}"))
            .context("caps: user agent")?;
        caps.add_arg(&format!("--window-size={},{}", WINDOW_SIZE.0, WINDOW_SIZE.1))
            .context("caps: window size")?;
        caps.add_arg("--disable-blink-features=AutomationControlled")
            .context("caps: automation flag")?;

        let driver = WebDriver::new(&opts.webdriver_url, caps)
            .await
            .with_context(|| format!("webdriver session at {}", opts.webdriver_url))?;
        driver
            .set_page_load_timeout(Duration::from_secs(PAGE_LOAD_SECS))
            .await
            .context("page load timeout")?;

        info!(url = %opts.webdriver_url, "browser session up");
        Ok(Self { driver, shot_dir: opts.shot_dir.clone(), markers, shot_seq: 0 })
    }

    pub async fn close(self) {
        if let Err(e) = self.driver.quit().await {
            warn!("browser quit failed: {e}");
        }
    }

    /// Poll for a link by visible text and click it. The menus render late,
    /// so absence right now is not absence in a second.
    async fn click_menu(&self, text: &str, what: &str, wait_secs: u64) -> Result<(), PageError> {
        let deadline = Instant::now() + Duration::from_secs(wait_secs);
        loop {
            if let Some(el) = PageQuery::new(&self.driver).find_by_visible_text(text).await? {
                el.click().await.map_err(|e| recoverable(what, &e))?;
                settle().await;
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(PageError::NotFound(s!(what)));
            }
            sleep(Duration::from_millis(POLL_MS)).await;
        }
    }
}

#[async_trait]
impl Site for SiteSession {
    type Page = LiveCalendarPage;

    async fn open_calendar(
        &mut self,
        target: &FacilityTarget,
    ) -> Result<(LiveCalendarPage, String), PageError> {
        self.driver
            .goto(SITE_URL)
            .await
            .map_err(|e| PageError::Timeout(format!("top page: {e}")))?;
        settle().await;

        self.click_menu("施設の空き状況", "空き状況メニュー", MENU_WAIT_SECS).await?;
        self.click_menu("施設から探す", "施設から探すメニュー", MENU_WAIT_SECS).await?;
        self.click_menu(&target.name, "施設リンク", MENU_WAIT_SECS).await?;

        let q = PageQuery::new(&self.driver);
        let Some((room_el, room_label)) = q.find_link_matching(&target.room_keywords).await? else {
            return Err(PageError::NotFound(format!("room link for {}", target.name)));
        };
        room_el
            .click()
            .await
            .map_err(|e| recoverable("room link", &e))?;

        wait_for_css(&self.driver, CAL_TABLE, "calendar table", ELEMENT_WAIT_SECS).await?;
        debug!(facility = %target.name, room = %room_label, "calendar reached");

        Ok((
            LiveCalendarPage { driver: self.driver.clone(), markers: self.markers.clone() },
            room_label,
        ))
    }

    async fn capture(&mut self, label: &str) -> Option<PathBuf> {
        self.shot_seq += 1;
        if let Err(e) = tokio::fs::create_dir_all(&self.shot_dir).await {
            warn!("cannot create shot dir: {e}");
            return None;
        }
        let stem = sanitize_label(label, self.shot_seq);
        let path = self.shot_dir.join(format!("{SHOT_PREFIX}{stem}.png"));
        match self.driver.screenshot(&path).await {
            Ok(()) => {
                info!(?path, "diagnostic screenshot captured");
                Some(path)
            }
            Err(e) => {
                warn!("screenshot failed: {e}");
                None
            }
        }
    }
}

/// The live monthly calendar view. Holds a handle to the one browser
/// session; creating it does not navigate — SiteSession already did.
pub struct LiveCalendarPage {
    driver: WebDriver,
    markers: MarkerSet,
}

#[async_trait]
impl CalendarPage for LiveCalendarPage {
    async fn month_label(&mut self) -> Result<Option<String>, PageError> {
        let found = self
            .driver
            .find_all(By::Css(".cal_month, .cal_title"))
            .await
            .map_err(fatal)?;
        match found.into_iter().next() {
            // Unreadable heading is the same as no heading.
            Some(el) => Ok(el.text().await.ok()),
            None => Ok(None),
        }
    }

    async fn cells(&mut self) -> Result<Vec<CalendarCell>, PageError> {
        let tds = self
            .driver
            .find_all(By::Css(&format!("{CAL_TABLE} td")))
            .await
            .map_err(fatal)?;

        let mut out = Vec::with_capacity(tds.len());
        for td in &tds {
            let Some(day) = day_number(td).await else {
                continue; // spacer/padding cell
            };
            let category = td.attr("class").await.ok().flatten().unwrap_or_default();
            let (icon_alt, icon_src) = status_icon(td).await;
            out.push(CalendarCell { day, category, icon_alt, icon_src });
        }
        Ok(out)
    }

    async fn advance_month(&mut self) -> Result<bool, PageError> {
        let q = PageQuery::new(&self.driver);
        let mut control = q.find_by_visible_text("次の月").await?;
        if control.is_none() {
            control = q.find_by_image_alt("次").await?;
        }
        if control.is_none() {
            // Newer revisions strip the alt text; the icon filename survives.
            control = q.find_by_image_src_fragment("next").await?;
        }
        let Some(el) = control else {
            debug!("no next-month control; end of bookable range");
            return Ok(false);
        };
        el.click()
            .await
            .map_err(|e| recoverable("next-month control", &e))?;
        settle().await;
        wait_for_css(&self.driver, CAL_TABLE, "calendar after month advance", ELEMENT_WAIT_SECS)
            .await?;
        Ok(true)
    }

    async fn evening_slot_vacant(&mut self, day: u8) -> Result<bool, PageError> {
        self.open_day(day).await?;
        let verdict = self.inspect_evening().await;
        let restored = self.return_to_calendar().await;
        match (verdict, restored) {
            (Ok(v), Ok(())) => Ok(v),
            (Err(e), _) => Err(e),
            (_, Err(e)) => Err(e),
        }
    }
}

impl LiveCalendarPage {
    async fn open_day(&self, day: u8) -> Result<(), PageError> {
        let tds = self
            .driver
            .find_all(By::Css(&format!("{CAL_TABLE} td")))
            .await
            .map_err(fatal)?;
        for td in &tds {
            if day_number(td).await != Some(day) {
                continue;
            }
            let links = td.find_all(By::Css("a")).await.map_err(fatal)?;
            let Some(link) = links.into_iter().next() else {
                return Err(PageError::NotFound(format!("day {day} has no detail link")));
            };
            link.click()
                .await
                .map_err(|e| recoverable("day detail link", &e))?;
            settle().await;
            return Ok(());
        }
        Err(PageError::NotFound(format!("day cell {day}")))
    }

    /// In the detail view, does the 19:00 row carry a vacancy marker?
    async fn inspect_evening(&self) -> Result<bool, PageError> {
        let rows = self
            .driver
            .find_all(By::XPath(&format!("//tr[contains(., '{EVENING_SLOT}')]")))
            .await
            .map_err(fatal)?;
        if rows.is_empty() {
            debug!("no {EVENING_SLOT} row in detail view");
            return Ok(false);
        }
        for row in &rows {
            let imgs = row.find_all(By::Css("img")).await.map_err(fatal)?;
            for img in &imgs {
                let alt = img.attr("alt").await.ok().flatten();
                let src = img.attr("src").await.ok().flatten();
                let annotated = CalendarCell { icon_alt: alt, icon_src: src, ..Default::default() };
                if self.markers.classify(&annotated).is_some() {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Back to the month view. Called after the drill-down no matter how it
    /// went, so the month loop never starts from a detail page.
    async fn return_to_calendar(&self) -> Result<(), PageError> {
        self.driver
            .back()
            .await
            .map_err(|e| recoverable("history back from detail view", &e))?;
        settle().await;
        wait_for_css(&self.driver, CAL_TABLE, "calendar after drill-down", ELEMENT_WAIT_SECS)
            .await?;
        Ok(())
    }
}

/* ---------------- shared lookups ---------------- */

async fn settle() {
    sleep(Duration::from_millis(SETTLE_MS)).await;
}

/// Bounded poll for a CSS match; the site renders tables well after load.
pub(super) async fn wait_for_css(
    driver: &WebDriver,
    css: &str,
    what: &str,
    wait_secs: u64,
) -> Result<WebElement, PageError> {
    let deadline = Instant::now() + Duration::from_secs(wait_secs);
    loop {
        let found = driver.find_all(By::Css(css)).await.map_err(fatal)?;
        if let Some(el) = found.into_iter().next() {
            return Ok(el);
        }
        if Instant::now() >= deadline {
            return Err(PageError::Timeout(s!(what)));
        }
        sleep(Duration::from_millis(POLL_MS)).await;
    }
}

/// Day number from the cell's .cal_day element; "15" or "15日".
async fn day_number(td: &WebElement) -> Option<u8> {
    let spans = td.find_all(By::Css(".cal_day")).await.ok()?;
    let span = spans.into_iter().next()?;
    let text = span.text().await.ok()?;
    text.trim().trim_end_matches('日').parse::<u8>().ok()
}

/// The cell's status icon annotations: first image with descriptive text
/// wins; otherwise fall back to the first image source identifier.
async fn status_icon(td: &WebElement) -> (Option<String>, Option<String>) {
    let Ok(imgs) = td.find_all(By::Css("img")).await else {
        return (None, None);
    };
    let mut fallback_src = None;
    for img in &imgs {
        let alt = img
            .attr("alt")
            .await
            .ok()
            .flatten()
            .filter(|a| !a.trim().is_empty());
        let src = img.attr("src").await.ok().flatten();
        if alt.is_some() {
            return (alt, src);
        }
        if fallback_src.is_none() {
            fallback_src = src;
        }
    }
    (None, fallback_src)
}
