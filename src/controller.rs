//! Page controller: turns user actions and backend answers into view-model
//! updates. No I/O happens here; network work is handed out as [`Command`]s
//! and the results come back as [`Outcome`]s.

use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::error::ClientResult;
use crate::format::format_duration;
use crate::model::{DownloadKind, DownloadLink, DownloadRequest, SupportedSite, VideoInfo};
use crate::session::{Session, Ticket};
use crate::view::{Banner, DownloadButton, InfoPanel, InlinePlayer, PageView};

pub const INFO_FALLBACK: &str = "Failed to fetch video information";
pub const DOWNLOAD_FALLBACK: &str = "Failed to process download";
pub const SITES_FALLBACK: &str = "Failed to load supported sites";
pub const MISSING_FORMAT: &str = "Please select a format before downloading";

/// Backend work requested by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchSites,
    FetchInfo { ticket: Ticket, url: String },
    FetchDownload { request: DownloadRequest },
}

/// Result of running a [`Command`]
#[derive(Debug)]
pub enum Outcome {
    Sites(ClientResult<Vec<SupportedSite>>),
    Info {
        ticket: Ticket,
        url: String,
        result: ClientResult<VideoInfo>,
    },
    Download(ClientResult<DownloadLink>),
}

/// A resolved download waiting for a destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub source: String,
    /// Suggested file name; the backend's title, unsanitized
    pub filename: String,
}

/// Side effect for the front end to carry out after applying an outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadThumbnail(String),
    Save(SaveRequest),
}

pub struct PageController {
    view: PageView,
    session: Session,
    banner_ttl: Duration,
}

impl PageController {
    pub fn new(banner_ttl: Duration) -> Self {
        Self {
            view: PageView::default(),
            session: Session::default(),
            banner_ttl,
        }
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The URL text field, edited in place by the front end.
    pub fn url_input_mut(&mut self) -> &mut String {
        &mut self.view.url_input
    }

    pub fn load_sites(&self) -> Command {
        Command::FetchSites
    }

    /// Form submit. Returns `None` when the input is empty or already shown.
    pub fn submit(&mut self) -> Option<Command> {
        let url = self.view.url_input.trim().to_string();
        if url.is_empty() {
            return None;
        }
        if self.session.is_current(&url) {
            debug!("{url} is already displayed, skipping fetch");
            return None;
        }

        self.view.banner = None;
        self.view.info = None;
        self.view.download_button = DownloadButton::Hidden;
        self.view.options_visible = false;
        self.view.player = None;
        self.view.formats.reset();
        self.session.clear_current_url();

        let ticket = self.session.begin_info();
        self.sync_spinner();
        Some(Command::FetchInfo { ticket, url })
    }

    pub fn select_format(&mut self, format_id: Option<&str>) {
        self.view.formats.select(format_id);
        if self.view.download_button != DownloadButton::Hidden {
            self.view.download_button = if self.view.formats.selected().is_some() {
                DownloadButton::Enabled
            } else {
                DownloadButton::Disabled
            };
        }
    }

    /// Reveals the download-type choices; a disabled button does nothing.
    pub fn press_download(&mut self) {
        if self.view.download_button == DownloadButton::Enabled {
            self.view.options_visible = true;
        }
    }

    pub fn choose_download_type(&mut self, kind: DownloadKind, now: Instant) -> Option<Command> {
        let url = self.session.current_url().map(str::to_owned);
        let format = self.view.formats.selected().map(str::to_owned);
        let (Some(url), Some(format)) = (url, format) else {
            self.show_error(MISSING_FORMAT.to_string(), now);
            return None;
        };
        let request = DownloadRequest { url, format, kind };

        self.view.options_visible = false;
        self.session.begin_download();
        self.sync_spinner();
        Some(Command::FetchDownload { request })
    }

    /// Plays the resolved URL inline; ignored until a URL has resolved.
    pub fn click_preview(&mut self) {
        if let Some(url) = self.session.current_url() {
            self.view.player = Some(InlinePlayer {
                source: url.to_string(),
            });
        }
    }

    pub fn apply(&mut self, outcome: Outcome, now: Instant) -> Option<Effect> {
        let effect = match outcome {
            Outcome::Sites(result) => {
                self.apply_sites(result, now);
                None
            }
            Outcome::Info { ticket, url, result } => self.apply_info(ticket, url, result, now),
            Outcome::Download(result) => self.apply_download(result, now),
        };
        self.sync_spinner();
        effect
    }

    /// Clears the banner once it has been up for the configured time.
    pub fn tick(&mut self, now: Instant) {
        if self
            .view
            .banner
            .as_ref()
            .is_some_and(|banner| banner.is_expired(now, self.banner_ttl))
        {
            self.view.banner = None;
        }
    }

    fn apply_sites(&mut self, result: ClientResult<Vec<SupportedSite>>, now: Instant) {
        match result {
            Ok(sites) => {
                debug!("backend supports {} sites", sites.len());
                self.view.sites = sites;
            }
            Err(err) => {
                warn!("failed to load supported sites: {err}");
                self.show_error(SITES_FALLBACK.to_string(), now);
            }
        }
    }

    fn apply_info(
        &mut self,
        ticket: Ticket,
        url: String,
        result: ClientResult<VideoInfo>,
        now: Instant,
    ) -> Option<Effect> {
        if !self.session.finish_info(ticket) {
            debug!("dropping superseded info response for {url}");
            return None;
        }

        match result {
            Ok(info) => {
                info!("loaded \"{}\" with {} formats", info.title, info.formats.len());
                let thumbnail = info.thumbnail;
                self.view.info = Some(InfoPanel {
                    title: info.title,
                    thumbnail: thumbnail.clone(),
                    duration_label: format!("Duration: {}", format_duration(info.duration)),
                });
                self.view.formats.replace(info.formats);
                self.view.download_button = DownloadButton::Disabled;
                self.session.set_current_url(url);
                (!thumbnail.is_empty()).then_some(Effect::LoadThumbnail(thumbnail))
            }
            Err(err) => {
                warn!("info request for {url} failed: {err}");
                self.show_error(err.user_message(INFO_FALLBACK), now);
                None
            }
        }
    }

    fn apply_download(&mut self, result: ClientResult<DownloadLink>, now: Instant) -> Option<Effect> {
        self.session.finish_download();
        match result {
            Ok(link) => Some(Effect::Save(SaveRequest {
                source: link.download_url,
                filename: link.title,
            })),
            Err(err) => {
                warn!("download request failed: {err}");
                self.show_error(err.user_message(DOWNLOAD_FALLBACK), now);
                None
            }
        }
    }

    fn show_error(&mut self, text: String, now: Instant) {
        self.view.banner = Some(Banner { text, raised_at: now });
    }

    fn sync_spinner(&mut self) {
        self.view.spinner = self.session.is_busy();
    }
}
