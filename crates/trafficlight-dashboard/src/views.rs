//! View types for the display list.
//!
//! These carry pre-formatted strings so templates and JSON consumers stay
//! simple: the status is already a CSS token and the URL is already
//! truncated for display.

use serde::Serialize;

use trafficlight_core::{LightStatus, Position};

/// URLs longer than this many characters are truncated for display.
pub const URL_DISPLAY_MAX: usize = 26;

/// Characters kept from a truncated URL, before the ellipsis.
pub const URL_TRUNCATED_KEEP: usize = 23;

const ELLIPSIS: &str = "...";

/// Shorten `url` to at most [`URL_DISPLAY_MAX`] visible characters.
pub fn truncate_url(url: &str) -> String {
    if url.chars().count() > URL_DISPLAY_MAX {
        let mut short: String = url.chars().take(URL_TRUNCATED_KEEP).collect();
        short.push_str(ELLIPSIS);
        short
    } else {
        url.to_string()
    }
}

/// One rendered item: an indicator styled by status plus the display URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightView {
    pub position: Position,
    pub status: LightStatus,
    /// Status token for the `red-<status>` / `green-<status>` classes.
    pub status_token: &'static str,
    /// Truncated URL as shown on the page.
    pub url: String,
    /// Untruncated URL, used as the hover title.
    pub full_url: String,
}

impl LightView {
    pub fn new(position: Position, status: LightStatus, url: &str) -> Self {
        Self {
            position,
            status,
            status_token: status.token(),
            url: truncate_url(url),
            full_url: url.to_string(),
        }
    }
}

/// A display row: the stable wrapper keyed by position and its current item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub position: Position,
    pub item: LightView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_url_is_unchanged() {
        assert_eq!(truncate_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn url_at_limit_is_unchanged() {
        let url = "https://abcdefghijklmno.io";
        assert_eq!(url.len(), URL_DISPLAY_MAX);
        assert_eq!(truncate_url(url), url);
    }

    #[test]
    fn long_url_keeps_23_chars_and_ellipsis() {
        let url = "https://abcdefghijklmnopqr.io";
        assert_eq!(url.len(), 29);
        let url = format!("{url}/");
        assert_eq!(url.len(), 30);

        let short = truncate_url(&url);
        assert_eq!(short, "https://abcdefghijklmno...");
        assert_eq!(short.chars().count(), URL_DISPLAY_MAX);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let url = "https://ééééééééééééééééééééé.fr";
        let short = truncate_url(url);
        assert_eq!(short.chars().count(), URL_DISPLAY_MAX);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn light_view_carries_status_token() {
        let view = LightView::new(2, LightStatus::Error, "https://example.com");
        assert_eq!(view.status_token, "error");
        assert_eq!(view.position, 2);
        assert_eq!(view.full_url, "https://example.com");
    }
}
