//! Client side of the video backend's HTTP contract.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::model::{DownloadLink, DownloadRequest, ErrorBody, SupportedSite, VideoInfo};

const SITES_PATH: &str = "supported-sites";
const INFO_PATH: &str = "get-info";
const DOWNLOAD_PATH: &str = "download";

/// The three calls the page needs from the backend.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn supported_sites(&self) -> ClientResult<Vec<SupportedSite>>;

    async fn video_info(&self, url: &str) -> ClientResult<VideoInfo>;

    async fn download_link(&self, request: &DownloadRequest) -> ClientResult<DownloadLink>;
}

/// [`Backend`] over HTTP with form-encoded POST bodies.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    /// `base` must end with `/`; endpoints are joined relative to it.
    pub fn new(base: Url, request_timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn supported_sites(&self) -> ClientResult<Vec<SupportedSite>> {
        let endpoint = self.endpoint(SITES_PATH)?;
        debug!("GET {endpoint}");
        let response = self.client.get(endpoint).send().await?;
        read_json(response).await
    }

    async fn video_info(&self, url: &str) -> ClientResult<VideoInfo> {
        let endpoint = self.endpoint(INFO_PATH)?;
        debug!("POST {endpoint} url={url}");
        let response = self.client.post(endpoint).form(&[("url", url)]).send().await?;
        read_json(response).await
    }

    async fn download_link(&self, request: &DownloadRequest) -> ClientResult<DownloadLink> {
        let endpoint = self.endpoint(DOWNLOAD_PATH)?;
        debug!(
            "POST {endpoint} url={} format={} type={}",
            request.url,
            request.format,
            request.kind.as_str()
        );
        let response = self.client.post(endpoint).form(&request.form()).send().await?;
        read_json(response).await
    }
}

/// Decodes a success body as `T`, or a failure body's `error` field into
/// [`ClientError::Server`].
async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.is_empty());
        return Err(ClientError::Server { status, message });
    }
    Ok(serde_json::from_slice(&body)?)
}
