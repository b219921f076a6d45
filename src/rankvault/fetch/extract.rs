//! Pulls `(tier, lp)` for one queue out of a profile page.
//!
//! Everything that knows what the ranking site's markup looks like lives
//! here. When the site changes its markup, this module (or the markers in
//! `config.json`) is the only thing that needs to follow.

use crate::error::{Result, VaultError};
use crate::model::Queue;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

pub const DEFAULT_SOLO_MARKER: &str = "div.css-1wk31w7.egd6cgn0";
pub const DEFAULT_FLEX_MARKER: &str = "div.css-1muxmfk.egd6cgn0";

static CONTENT: Lazy<Selector> = Lazy::new(|| fixed_selector("div.content"));
static INFO: Lazy<Selector> = Lazy::new(|| fixed_selector("div.info"));
static TIER: Lazy<Selector> = Lazy::new(|| fixed_selector("div.tier"));
static LP: Lazy<Selector> = Lazy::new(|| fixed_selector("div.lp"));

fn fixed_selector(css: &str) -> Selector {
    Selector::parse(css).expect("built-in selector is valid CSS")
}

pub trait TierExtractor: Send {
    /// `Some((tier, lp))` when the queue's widget and both its tier and LP
    /// elements are present; `None` otherwise.
    fn extract_tier(&self, doc: &Html, queue: Queue) -> Option<(String, String)>;
}

/// Finds each queue's rank widget by its marker selector, then walks
/// `content > info > {tier, lp}` inside it.
pub struct WidgetExtractor {
    solo: Selector,
    flex: Selector,
}

impl WidgetExtractor {
    pub fn new(solo_marker: &str, flex_marker: &str) -> Result<Self> {
        Ok(Self {
            solo: parse_marker(solo_marker)?,
            flex: parse_marker(flex_marker)?,
        })
    }

    fn marker(&self, queue: Queue) -> &Selector {
        match queue {
            Queue::Solo => &self.solo,
            Queue::Flex => &self.flex,
        }
    }
}

impl Default for WidgetExtractor {
    fn default() -> Self {
        Self {
            solo: fixed_selector(DEFAULT_SOLO_MARKER),
            flex: fixed_selector(DEFAULT_FLEX_MARKER),
        }
    }
}

fn parse_marker(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| VaultError::Config(format!("Invalid widget selector '{}': {:?}", css, e)))
}

fn trimmed_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

impl TierExtractor for WidgetExtractor {
    fn extract_tier(&self, doc: &Html, queue: Queue) -> Option<(String, String)> {
        let widget = doc.select(self.marker(queue)).next()?;
        let content = widget.select(&CONTENT).next()?;
        let info = content.select(&INFO).next()?;
        let tier = info.select(&TIER).next()?;
        let lp = info.select(&LP).next()?;
        Some((trimmed_text(tier), trimmed_text(lp)))
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod testing {
    use super::{DEFAULT_FLEX_MARKER, DEFAULT_SOLO_MARKER};

    fn classes(marker: &str) -> String {
        marker.trim_start_matches("div.").replace('.', " ")
    }

    /// One rank widget in the site's markup shape.
    pub fn widget(marker: &str, tier: &str, lp: &str) -> String {
        format!(
            r#"<div class="{}"><div class="header">Ranked</div><div class="content">
                 <div class="info"><div class="tier">
                   {}
                 </div><div class="lp"> {} </div></div></div></div>"#,
            classes(marker),
            tier,
            lp
        )
    }

    /// A profile page with the given solo and flex widgets.
    pub fn profile_page(solo: Option<(&str, &str)>, flex: Option<(&str, &str)>) -> String {
        let solo = solo
            .map(|(t, lp)| widget(DEFAULT_SOLO_MARKER, t, lp))
            .unwrap_or_default();
        let flex = flex
            .map(|(t, lp)| widget(DEFAULT_FLEX_MARKER, t, lp))
            .unwrap_or_default();
        format!(
            "<html><head><title>profile</title></head><body><main>{}{}</main></body></html>",
            solo, flex
        )
    }
}
