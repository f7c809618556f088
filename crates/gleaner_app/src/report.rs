//! JSON report of a finished invocation, for scripting around the CLI.

use anyhow::Result;
use gleaner_core::{DownloadRow, DownloadStatus, ScrapePhase, ScrapeView};
use serde_json::{json, Value};

pub fn render_report(view: &ScrapeView) -> Result<String> {
    let attempts: Vec<Value> = view.downloads.iter().map(row_value).collect();
    let saved = view
        .downloads
        .iter()
        .filter(|row| matches!(row.status, DownloadStatus::Saved { .. }))
        .count();
    let report = json!({
        "status": phase_tag(view.phase),
        "error": view.error,
        "images_found": view.images_found,
        "links_found": view.links_found,
        "saved": saved,
        "attempts": attempts,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}

fn row_value(row: &DownloadRow) -> Value {
    match &row.status {
        DownloadStatus::Saved { file } => json!({
            "index": row.index,
            "url": row.url,
            "result": "saved",
            "file": file,
        }),
        DownloadStatus::Skipped { reason } => json!({
            "index": row.index,
            "url": row.url,
            "result": "skipped",
            "reason": reason,
        }),
        DownloadStatus::Failed { error } => json!({
            "index": row.index,
            "url": row.url,
            "result": "failed",
            "error": error,
        }),
    }
}

fn phase_tag(phase: ScrapePhase) -> &'static str {
    match phase {
        ScrapePhase::Waiting => "waiting",
        ScrapePhase::UrlRequired => "url-required",
        ScrapePhase::Scraping => "scraping",
        ScrapePhase::Complete => "complete",
        ScrapePhase::Failed => "failed",
    }
}
