use console::Style;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub mod names {
    pub const POSITION: &str = "position";
    pub const NAME: &str = "name";
    pub const TIER: &str = "tier";
    pub const SENTINEL: &str = "sentinel";
    pub const USAGE: &str = "usage";
    pub const HEADER: &str = "header";
    pub const CURRENT: &str = "current";
    pub const URL: &str = "url";
}

static THEME: Lazy<HashMap<&'static str, Style>> = Lazy::new(|| {
    HashMap::from([
        (names::POSITION, Style::new().yellow()),
        (names::NAME, Style::new().bold()),
        (names::TIER, Style::new().cyan()),
        (names::SENTINEL, Style::new().dim()),
        (names::USAGE, Style::new().dim()),
        (names::HEADER, Style::new().underlined()),
        (names::CURRENT, Style::new().green().bold()),
        (names::URL, Style::new().blue()),
    ])
});

/// Applies the named style. Padding must be done before painting.
pub fn paint(name: &str, text: &str, use_color: bool) -> String {
    match THEME.get(name) {
        Some(style) => style
            .clone()
            .force_styling(use_color)
            .apply_to(text)
            .to_string(),
        None => text.to_string(),
    }
}
