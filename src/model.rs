use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

use crate::format::format_file_size;

/// A platform the backend can fetch videos from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SupportedSite {
    pub name: String,
    /// Icon-font glyph name, e.g. `youtube`
    pub icon: String,
}

/// One downloadable encoding offered for a video
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormatOption {
    pub format_id: String,
    pub quality_label: String,
    /// Container extension, when the backend reports it
    #[serde(default)]
    pub ext: Option<String>,
    /// Size in bytes; backends send `0` or `null` when unknown
    #[serde(default)]
    pub filesize: Option<u64>,
}

impl FormatOption {
    /// Hover text with the extras the backend reported.
    pub fn details(&self) -> String {
        let size = format_file_size(self.filesize.unwrap_or(0));
        match self.ext.as_deref().filter(|ext| !ext.is_empty()) {
            Some(ext) => format!("{ext}, {size}"),
            None => size,
        }
    }
}

/// Response of `POST get-info`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    /// Whole seconds; fractional, missing and `null` durations are accepted
    #[serde(default, deserialize_with = "whole_seconds")]
    pub duration: u64,
    #[serde(default)]
    pub formats: Vec<FormatOption>,
}

fn whole_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.filter(|secs| secs.is_finite() && *secs > 0.0).map_or(0, |secs| secs.floor() as u64))
}

/// Kind of asset the backend extracts for a download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    Video,
    Audio,
}

impl DownloadKind {
    pub const ALL: [DownloadKind; 2] = [DownloadKind::Video, DownloadKind::Audio];

    /// Token sent in the `type` form field
    pub fn as_str(self) -> &'static str {
        match self {
            DownloadKind::Video => "video",
            DownloadKind::Audio => "audio",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DownloadKind::Video => "🎬 Video",
            DownloadKind::Audio => "🎵 Audio only",
        }
    }
}

/// Form body of `POST download`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub format: String,
    pub kind: DownloadKind,
}

impl DownloadRequest {
    pub fn form(&self) -> [(&'static str, &str); 3] {
        [
            ("url", self.url.as_str()),
            ("format", self.format.as_str()),
            ("type", self.kind.as_str()),
        ]
    }
}

/// Response of `POST download`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadLink {
    pub download_url: String,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_title() -> String {
    "video".to_string()
}

/// Body the backend sends alongside non-success statuses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Represents the current state of a file save
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    /// Bytes are still arriving
    Saving,
    /// File written completely
    Done,
    /// Save aborted with the given reason
    Failed(String),
}

/// A resolved download being written to disk, listed in the side panel
#[derive(Debug, Clone)]
pub struct SaveTask {
    pub id: u64,
    /// Title the backend returned for the download
    pub title: String,
    /// Destination picked in the save dialog
    pub path: PathBuf,
    pub status: SaveStatus,
    pub received: u64,
    pub total: Option<u64>,
}

impl SaveTask {
    pub fn new(id: u64, title: String, path: PathBuf) -> Self {
        Self {
            id,
            title,
            path,
            status: SaveStatus::Saving,
            received: 0,
            total: None,
        }
    }

    /// Progress between 0.0 and 1.0; unknown totals read as 0 until done.
    pub fn fraction(&self) -> f32 {
        match (&self.status, self.total) {
            (SaveStatus::Done, _) => 1.0,
            (_, Some(total)) if total > 0 => (self.received as f64 / total as f64).min(1.0) as f32,
            _ => 0.0,
        }
    }

    pub fn size_label(&self) -> String {
        match self.total {
            Some(total) => format!("{} of {}", format_file_size(self.received), format_file_size(total)),
            None => format_file_size(self.received),
        }
    }
}
