//! View model rendered by the egui front end.

use std::time::{Duration, Instant};

use crate::model::{FormatOption, SupportedSite};

/// Text of the empty first entry of the quality list
pub const FORMAT_PLACEHOLDER: &str = "Select quality";

/// Error banner with the moment it was raised
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub text: String,
    pub raised_at: Instant,
}

impl Banner {
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.raised_at) >= ttl
    }
}

/// Metadata block shown after a successful info fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPanel {
    pub title: String,
    /// Empty when the backend had no thumbnail
    pub thumbnail: String,
    pub duration_label: String,
}

/// The quality drop-down: placeholder first, then the backend's formats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatSelect {
    options: Vec<FormatOption>,
    selected: Option<String>,
}

impl FormatSelect {
    /// Back to the placeholder as the only option.
    pub fn reset(&mut self) {
        self.options.clear();
        self.selected = None;
    }

    pub fn replace(&mut self, options: Vec<FormatOption>) {
        self.options = options;
        self.selected = None;
    }

    /// Selects `format_id`; ids not in the list select the placeholder.
    pub fn select(&mut self, format_id: Option<&str>) {
        self.selected = format_id
            .filter(|id| self.options.iter().any(|option| option.format_id == *id))
            .map(str::to_owned);
    }

    pub fn options(&self) -> &[FormatOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_label(&self) -> &str {
        self.selected
            .as_deref()
            .and_then(|id| self.options.iter().find(|option| option.format_id == id))
            .map_or(FORMAT_PLACEHOLDER, |option| option.quality_label.as_str())
    }

    /// `(value, label)` pairs as rendered, placeholder (empty value) first.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        std::iter::once(("", FORMAT_PLACEHOLDER))
            .chain(
                self.options
                    .iter()
                    .map(|option| (option.format_id.as_str(), option.quality_label.as_str())),
            )
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadButton {
    #[default]
    Hidden,
    Disabled,
    Enabled,
}

/// Inline player revealed by clicking the preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePlayer {
    pub source: String,
}

/// Everything the page shows.
#[derive(Debug, Clone, Default)]
pub struct PageView {
    pub url_input: String,
    pub sites: Vec<SupportedSite>,
    pub spinner: bool,
    pub banner: Option<Banner>,
    pub info: Option<InfoPanel>,
    pub formats: FormatSelect,
    pub download_button: DownloadButton,
    pub options_visible: bool,
    pub player: Option<InlinePlayer>,
}

impl PageView {
    /// Whether a thumbnail fetched from `url` belongs to the info panel on screen.
    pub fn wants_thumbnail(&self, url: &str) -> bool {
        self.info
            .as_ref()
            .is_some_and(|info| !info.thumbnail.is_empty() && info.thumbnail == url)
    }
}

/// Glyph standing in for the icon-font icon named `icon`.
pub fn site_glyph(icon: &str) -> &'static str {
    match icon {
        "youtube" => "▶",
        "instagram" => "📷",
        "facebook" => "📘",
        "twitter" | "twitter-x" => "🐦",
        "tiktok" => "🎵",
        "vimeo" => "🎞",
        "twitch" => "🎮",
        _ => "🌐",
    }
}
