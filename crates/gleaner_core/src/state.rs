use crate::view_model::ScrapeView;

pub type InvocationId = u64;

/// Phase of the scrape cycle as shown by the status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrapePhase {
    /// Nothing submitted yet.
    #[default]
    Waiting,
    /// Last submission was empty after trimming.
    UrlRequired,
    /// An invocation is in flight.
    Scraping,
    /// Last invocation finished, downloads attempted.
    Complete,
    /// Last invocation aborted; the message is in `AppState::error`.
    Failed,
}

/// Final result of an invocation, as reported back by the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeResultKind {
    Completed,
    Failed { message: String },
}

/// Display-side outcome of one image attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStatus {
    Saved { file: String },
    Skipped { reason: String },
    Failed { error: String },
}

/// One row of the per-image attempt listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRow {
    /// Position among the page's `img` tags, in document order.
    pub index: usize,
    /// The resolved image URL, when resolution got that far.
    pub url: Option<String>,
    pub status: DownloadStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    url_input: String,
    phase: ScrapePhase,
    error: Option<String>,
    // Counters keep their previous values until the next successful parse;
    // a failed invocation leaves them stale on purpose.
    images_found: usize,
    links_found: usize,
    counted: bool,
    downloads: Vec<DownloadRow>,
    invocation: InvocationId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ScrapePhase {
        self.phase
    }

    pub fn view(&self) -> ScrapeView {
        ScrapeView {
            phase: self.phase,
            error: self.error.clone(),
            images_found: self.images_found,
            links_found: self.links_found,
            counted: self.counted,
            downloads: self.downloads.clone(),
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub(crate) fn set_input(&mut self, text: String) {
        self.url_input = text;
    }

    pub(crate) fn trimmed_input(&self) -> &str {
        self.url_input.trim()
    }

    pub(crate) fn require_url(&mut self) {
        self.phase = ScrapePhase::UrlRequired;
        self.error = None;
        self.mark_dirty();
    }

    /// Starts a new invocation: fresh id, fresh attempt rows, counters kept.
    pub(crate) fn begin_scrape(&mut self) -> InvocationId {
        self.invocation += 1;
        self.phase = ScrapePhase::Scraping;
        self.error = None;
        self.counted = false;
        self.downloads.clear();
        self.mark_dirty();
        self.invocation
    }

    pub(crate) fn is_current(&self, invocation: InvocationId) -> bool {
        invocation == self.invocation
    }

    pub(crate) fn apply_counts(&mut self, images: usize, links: usize) {
        self.images_found = images;
        self.links_found = links;
        self.counted = true;
        self.mark_dirty();
    }

    pub(crate) fn push_download(&mut self, row: DownloadRow) {
        self.downloads.push(row);
        self.mark_dirty();
    }

    pub(crate) fn complete(&mut self) {
        self.phase = ScrapePhase::Complete;
        self.error = None;
        self.mark_dirty();
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.phase = ScrapePhase::Failed;
        self.error = Some(message);
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
