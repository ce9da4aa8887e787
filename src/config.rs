use clap::Parser;
use log::LevelFilter;
use std::{path::PathBuf, time::Duration};
use url::Url;

const DEFAULT_SERVER: &str = "http://127.0.0.1:5000/";
const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";

/// Command line flags, each also settable from the environment
#[derive(Debug, Parser)]
#[command(name = "video-fetch", version, about = "Fetch video info from a download backend and save files")]
pub struct Cli {
    /// Base URL of the backend
    #[arg(long, env = "VIDEO_FETCH_SERVER", default_value = DEFAULT_SERVER)]
    pub server: Url,

    /// Folder the save dialog opens in
    #[arg(long, env = "VIDEO_FETCH_DOWNLOAD_DIR", default_value = DEFAULT_DOWNLOAD_DIR)]
    pub download_dir: PathBuf,

    /// Seconds an error banner stays visible
    #[arg(long, env = "VIDEO_FETCH_ERROR_TIMEOUT_SECS", default_value_t = 5)]
    pub error_timeout_secs: u64,

    /// Seconds before an API request is abandoned
    #[arg(long, env = "VIDEO_FETCH_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Log verbosity: off, error, warn, info, debug or trace
    #[arg(long, env = "VIDEO_FETCH_LOG", default_value = "info")]
    pub log_level: LevelFilter,
}

/// Resolved settings used by the app
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub server: Url,
    pub download_dir: PathBuf,
    pub error_timeout: Duration,
    pub request_timeout: Duration,
    pub log_level: LevelFilter,
}

impl From<Cli> for ClientConfig {
    fn from(cli: Cli) -> Self {
        Self {
            server: with_trailing_slash(cli.server),
            download_dir: cli.download_dir,
            error_timeout: Duration::from_secs(cli.error_timeout_secs),
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            log_level: cli.log_level,
        }
    }
}

/// Endpoints are joined relative to the base, which needs a trailing `/`
/// for a path prefix to survive the join.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
