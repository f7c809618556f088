//! Gleaner engine: fetches a page, counts its `img` and `a` tags, and
//! downloads the allow-listed images into a numbered output directory.
//!
//! The pipeline is a plain async function, [`scrape`], taking a [`Fetcher`]
//! and a [`ProgressSink`] so tests can drive it against mock servers and
//! capture everything it emits. [`EngineHandle`] wraps the pipeline in a
//! worker thread with its own runtime for synchronous frontends.

mod decode;
mod engine;
mod fetch;
mod harvest;
mod persist;
mod scrape;
mod survey;
mod types;

pub use decode::{decode_page, DecodedPage};
pub use engine::{EngineConfig, EngineHandle};
pub use fetch::{ChannelProgressSink, FetchSettings, Fetcher, ProgressSink, ReqwestFetcher};
pub use harvest::{
    harvest_images, image_extension, resolve_image_url, HarvestSettings, SlotPolicy,
    DEFAULT_OUTPUT_DIR,
};
pub use persist::{ensure_output_dir, ImageFileWriter, PersistError};
pub use scrape::scrape;
pub use survey::{survey_document, DocumentSurvey, ImageRef};
pub use types::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, ImageAttempt, ImageOutcome, InvocationId,
    ScrapeError, ScrapeEvent, ScrapeFailure, ScrapeOutcome, ScrapeProgress, SkipReason, Stage,
};
