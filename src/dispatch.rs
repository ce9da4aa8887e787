use log::debug;

use crate::api::Backend;
use crate::controller::{Command, Outcome};

/// Runs one controller command against the backend.
pub async fn execute(backend: &dyn Backend, command: Command) -> Outcome {
    debug!("running {command:?}");
    match command {
        Command::FetchSites => Outcome::Sites(backend.supported_sites().await),
        Command::FetchInfo { ticket, url } => {
            let result = backend.video_info(&url).await;
            Outcome::Info { ticket, url, result }
        }
        Command::FetchDownload { request } => Outcome::Download(backend.download_link(&request).await),
    }
}
