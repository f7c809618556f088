//! HTTP layer: a [`Fetcher`] trait so the pipeline can be driven against
//! mock servers in tests, plus the production [`ReqwestFetcher`].

use std::sync::mpsc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::types::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, InvocationId, ScrapeEvent, ScrapeProgress,
    Stage,
};

/// Knobs for the HTTP layer. The defaults mirror a plain browser-tab
/// fetch: no overall deadline, and the page request announcing
/// `Mozilla/5.0`.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Sent on the page request only; image requests go out with the
    /// client's default headers.
    pub user_agent: String,
    /// Whole-request deadline. `None` waits as long as the server does.
    pub request_timeout: Option<Duration>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            request_timeout: None,
        }
    }
}

/// Receiver for events emitted while an invocation runs.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ScrapeEvent);
}

/// Forwards events into an `mpsc` channel; a closed channel drops them.
pub struct ChannelProgressSink {
    tx: mpsc::Sender<ScrapeEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<ScrapeEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: ScrapeEvent) {
        let _ = self.tx.send(event);
    }
}

/// The two requests the pipeline makes, behind a trait seam.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// GET the page itself, identifying as a browser, streaming the body
    /// with byte-count progress.
    async fn fetch_page(
        &self,
        invocation: InvocationId,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<FetchOutput, FetchError>;

    /// GET one image body. No identity header, no progress.
    async fn fetch_image(&self, url: &str) -> Result<Bytes, FetchError>;
}

/// Production fetcher. Builds a fresh client per call so settings changes
/// between invocations take effect without connection-pool surprises.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch_page(
        &self,
        invocation: InvocationId,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<FetchOutput, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = self.build_client()?;

        let response = client
            .get(parsed)
            .header(USER_AGENT, self.settings.user_agent.as_str())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            bytes.extend_from_slice(&chunk);
            sink.emit(ScrapeEvent::Progress(ScrapeProgress {
                invocation,
                stage: Stage::Fetching,
                bytes: Some(bytes.len() as u64),
            }));
        }

        let byte_len = bytes.len() as u64;
        Ok(FetchOutput {
            bytes,
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url,
                content_type,
                byte_len,
            },
        })
    }

    async fn fetch_image(&self, url: &str) -> Result<Bytes, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = self.build_client()?;

        let response = client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
