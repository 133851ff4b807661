// src/navigator/query.rs

use thirtyfour::error::WebDriverError;
use thirtyfour::{By, WebDriver, WebElement};

use crate::core::page::PageError;

/// Selector heuristics against the current page. The site renames link text
/// and swaps icon markup between revisions, so every lookup returns an
/// Option and tries more than one strategy before giving up.
pub struct PageQuery<'d> {
    driver: &'d WebDriver,
}

impl<'d> PageQuery<'d> {
    pub fn new(driver: &'d WebDriver) -> Self {
        Self { driver }
    }

    /// Link by exact visible text, then by contains-match.
    pub async fn find_by_visible_text(&self, text: &str) -> Result<Option<WebElement>, PageError> {
        let exact = self
            .driver
            .find_all(By::LinkText(text))
            .await
            .map_err(fatal)?;
        if let Some(el) = exact.into_iter().next() {
            return Ok(Some(el));
        }
        let partial = self
            .driver
            .find_all(By::PartialLinkText(text))
            .await
            .map_err(fatal)?;
        Ok(partial.into_iter().next())
    }

    /// First link matching any of the alternatives, tried in order. Returns
    /// the matched keyword too — it becomes the room label on records.
    pub async fn find_link_matching(
        &self,
        alternatives: &[String],
    ) -> Result<Option<(WebElement, String)>, PageError> {
        for alt in alternatives {
            if let Some(el) = self.find_by_visible_text(alt).await? {
                return Ok(Some((el, alt.clone())));
            }
        }
        Ok(None)
    }

    /// Image by descriptive-text fragment.
    pub async fn find_by_image_alt(&self, fragment: &str) -> Result<Option<WebElement>, PageError> {
        let found = self
            .driver
            .find_all(By::Css(&format!("img[alt*='{fragment}']")))
            .await
            .map_err(fatal)?;
        Ok(found.into_iter().next())
    }

    /// Image by source-identifier fragment; later site revisions dropped the
    /// alt text from status icons.
    pub async fn find_by_image_src_fragment(
        &self,
        fragment: &str,
    ) -> Result<Option<WebElement>, PageError> {
        let found = self
            .driver
            .find_all(By::Css(&format!("img[src*='{fragment}']")))
            .await
            .map_err(fatal)?;
        Ok(found.into_iter().next())
    }
}

// Lookup absence is modeled as Ok(None)/empty above; an error out of the
// protocol itself means the session is gone.
pub(super) fn fatal(e: WebDriverError) -> PageError {
    PageError::Fatal(e.to_string())
}

// Interaction with an element we already held: the markup shifted under us.
pub(super) fn recoverable(what: &str, e: &WebDriverError) -> PageError {
    PageError::NotFound(format!("{what}: {e}"))
}
