//! Shared engine types: events emitted while an invocation runs, the
//! outcome it produces, and the error shapes of the pipeline stages.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::persist::PersistError;

/// Identifier for one scrape invocation, assigned by the frontend.
pub type InvocationId = u64;

/// Pipeline stage of a running invocation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Accepted by the worker, not started yet.
    Queued,
    /// Page request in flight.
    Fetching,
    /// Page body parsed, tags being counted.
    Counting,
    /// Image batch in progress.
    Downloading,
    /// All work for the invocation finished.
    Done,
}

/// Progress beacon for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeProgress {
    pub invocation: InvocationId,
    pub stage: Stage,
    /// Page bytes received so far; only meaningful while fetching.
    pub bytes: Option<u64>,
}

/// Events streamed from the engine to the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeEvent {
    /// Stage transition or byte-count update.
    Progress(ScrapeProgress),
    /// Tag census of the fetched page. Emitted once per invocation, before
    /// any image work starts.
    PageCounted {
        invocation: InvocationId,
        images: usize,
        links: usize,
    },
    /// One image attempt settled, successfully or not.
    ImageFinished {
        invocation: InvocationId,
        attempt: ImageAttempt,
    },
    /// The invocation is over; carries the full outcome or the failure that
    /// aborted it.
    Finished {
        invocation: InvocationId,
        result: Result<ScrapeOutcome, ScrapeFailure>,
    },
}

/// Raw page bytes plus response metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

/// Facts about the page response worth keeping after the body is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    /// The URL as submitted.
    pub original_url: String,
    /// The URL the response actually came from, after redirects.
    pub final_url: String,
    /// Raw `Content-Type` header, if present.
    pub content_type: Option<String>,
    pub byte_len: u64,
}

/// Broad classification of a failure that aborts an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The submitted text does not parse as an absolute URL.
    InvalidUrl,
    /// The server answered with a non-success status.
    HttpStatus(u16),
    /// The request hit the configured deadline.
    Timeout,
    /// Connection, TLS or protocol trouble.
    Network,
    /// The output directory could not be created or written.
    OutputDir,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "request timed out"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::OutputDir => write!(f, "output directory unusable"),
        }
    }
}

/// Error from the fetch layer. The message keeps the transport's own
/// wording so frontends can show it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FetchError {}

/// Failure that aborts a whole invocation. Per-image trouble never ends up
/// here; it lands in [`ImageOutcome::Failed`] instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("output directory: {0}")]
    OutputDir(#[from] PersistError),
}

impl ScrapeError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ScrapeError::Fetch(err) => err.kind.clone(),
            ScrapeError::OutputDir(_) => FailureKind::OutputDir,
        }
    }

    /// Event-friendly rendition: cloneable kind plus display text.
    pub fn to_failure(&self) -> ScrapeFailure {
        ScrapeFailure {
            kind: self.failure_kind(),
            message: self.to_string(),
        }
    }
}

/// Cloneable form of [`ScrapeError`] for the event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl fmt::Display for ScrapeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Everything one finished invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOutcome {
    /// The URL as submitted.
    pub page_url: String,
    /// Where the page was actually served from.
    pub final_url: String,
    /// Number of `img` tags in the document.
    pub images_found: usize,
    /// Number of `a` tags in the document.
    pub links_found: usize,
    /// One entry per `img` tag, in document order.
    pub attempts: Vec<ImageAttempt>,
}

impl ScrapeOutcome {
    /// How many attempts ended with a file on disk.
    pub fn downloaded(&self) -> usize {
        self.attempts
            .iter()
            .filter(|attempt| matches!(attempt.outcome, ImageOutcome::Downloaded { .. }))
            .count()
    }
}

/// Record of what happened to one `img` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttempt {
    /// Zero-based position of the tag in document order.
    pub index: usize,
    /// Raw `src` attribute, trimmed; `None` when absent or empty.
    pub source: Option<String>,
    /// Absolute URL after resolution, when resolution got that far.
    pub resolved_url: Option<String>,
    pub outcome: ImageOutcome,
}

/// How one image attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Fetched and written; `path` is the final location.
    Downloaded { path: PathBuf },
    /// Never attempted; the tag did not qualify.
    Skipped { reason: SkipReason },
    /// Attempted and lost; the batch carried on.
    Failed { error: String },
}

/// Why an `img` tag was not downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No `src` attribute, or only whitespace.
    MissingSource,
    /// The `src` does not resolve against the page URL.
    UnresolvableSource,
    /// The resolved path's extension is not on the allow list.
    ExtensionNotAllowed { extension: Option<String> },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingSource => write!(f, "missing src attribute"),
            SkipReason::UnresolvableSource => write!(f, "src does not resolve against the page url"),
            SkipReason::ExtensionNotAllowed { extension: Some(ext) } => {
                write!(f, "extension {ext} not allow-listed")
            }
            SkipReason::ExtensionNotAllowed { extension: None } => {
                write!(f, "no file extension")
            }
        }
    }
}
