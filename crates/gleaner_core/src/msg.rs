use crate::state::{DownloadRow, InvocationId, ScrapeResultKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input box (raw text).
    InputChanged(String),
    /// User submitted the current input for scraping.
    ScrapeClicked,
    /// Engine counted the tags on the fetched page.
    PageCounted {
        invocation: InvocationId,
        images: usize,
        links: usize,
    },
    /// Engine finished one image attempt.
    DownloadFinished {
        invocation: InvocationId,
        row: DownloadRow,
    },
    /// Engine finished the whole invocation.
    ScrapeFinished {
        invocation: InvocationId,
        result: ScrapeResultKind,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
