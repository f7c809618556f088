//! Projects the core view model onto stdout, one label per line.

use gleaner_core::{DownloadRow, DownloadStatus, ScrapePhase, ScrapeView};

/// Status label for the current phase.
pub fn status_line(view: &ScrapeView) -> String {
    match view.phase {
        ScrapePhase::Waiting => "Status: Waiting for input...".to_string(),
        ScrapePhase::UrlRequired => "Status: Please enter a valid URL.".to_string(),
        ScrapePhase::Scraping => "Status: Scraping website...".to_string(),
        ScrapePhase::Complete => "Status: Scraping complete!".to_string(),
        ScrapePhase::Failed => match &view.error {
            Some(message) => format!("Error: {message}"),
            None => "Error: scrape failed".to_string(),
        },
    }
}

pub fn count_lines(view: &ScrapeView) -> [String; 2] {
    [
        format!("Images Found: {}", view.images_found),
        format!("Links Found: {}", view.links_found),
    ]
}

pub fn download_line(row: &DownloadRow) -> String {
    let subject = row.url.as_deref().unwrap_or("(no src)");
    match &row.status {
        DownloadStatus::Saved { file } => {
            format!("  [{}] saved {} as {}", row.index + 1, subject, file)
        }
        DownloadStatus::Skipped { reason } => {
            format!("  [{}] skipped {} ({})", row.index + 1, subject, reason)
        }
        DownloadStatus::Failed { error } => {
            format!("  [{}] failed {} ({})", row.index + 1, subject, error)
        }
    }
}

/// Remembers what already reached stdout so a re-render only prints what
/// changed since the last one.
pub struct StdoutRenderer {
    last_status: Option<String>,
    last_counts: Option<(usize, usize)>,
    rows_printed: usize,
}

impl StdoutRenderer {
    pub fn new() -> Self {
        Self {
            last_status: None,
            last_counts: None,
            rows_printed: 0,
        }
    }

    pub fn render(&mut self, view: &ScrapeView) {
        let status = status_line(view);
        if self.last_status.as_deref() != Some(status.as_str()) {
            println!("{status}");
            self.last_status = Some(status);
        }

        // Counts only appear once the current invocation has parsed; until
        // then they would just echo the previous invocation's values.
        let counts = (view.images_found, view.links_found);
        if view.counted && self.last_counts != Some(counts) {
            for line in count_lines(view) {
                println!("{line}");
            }
            self.last_counts = Some(counts);
        }

        // A fresh invocation can shrink the row list out from under us.
        for row in view.downloads.get(self.rows_printed..).unwrap_or(&[]) {
            println!("{}", download_line(row));
        }
        self.rows_printed = view.downloads.len();
    }
}

impl Default for StdoutRenderer {
    fn default() -> Self {
        Self::new()
    }
}
