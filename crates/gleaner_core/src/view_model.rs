use crate::state::{DownloadRow, ScrapePhase};

/// Snapshot of everything the frontend displays. The core hands out
/// structured fields only; turning them into labels, lines or widgets is
/// the frontend's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeView {
    pub phase: ScrapePhase,
    /// Error description when `phase` is `Failed`.
    pub error: Option<String>,
    pub images_found: usize,
    pub links_found: usize,
    /// Whether the current invocation has produced counts yet. While
    /// `false`, the counters still show the previous invocation's values.
    pub counted: bool,
    /// Attempt rows for the current invocation, in document order.
    pub downloads: Vec<DownloadRow>,
}
