//! One scrape invocation, end to end: fetch, decode, survey, harvest.

use url::Url;

use engine_logging::engine_info;

use crate::decode::decode_page;
use crate::fetch::{Fetcher, ProgressSink};
use crate::harvest::{harvest_images, HarvestSettings};
use crate::persist::ensure_output_dir;
use crate::survey::survey_document;
use crate::types::{
    FailureKind, FetchError, InvocationId, ScrapeError, ScrapeEvent, ScrapeOutcome, ScrapeProgress,
    Stage,
};

/// Run one invocation against `url` and return everything it produced.
///
/// Only two things abort an invocation: the page fetch failing and the
/// output directory being unusable. Per-image failures are recorded in the
/// outcome's attempts and the batch continues. Progress, the tag census
/// and each settled attempt are emitted through `sink` along the way, with
/// the census always ahead of any image event.
pub async fn scrape(
    invocation: InvocationId,
    url: &str,
    settings: &HarvestSettings,
    fetcher: &dyn Fetcher,
    sink: &dyn ProgressSink,
) -> Result<ScrapeOutcome, ScrapeError> {
    emit_stage(sink, invocation, Stage::Fetching);
    let page = fetcher.fetch_page(invocation, url, sink).await?;
    engine_info!(
        "fetched {} ({} bytes, served from {})",
        page.metadata.original_url,
        page.metadata.byte_len,
        page.metadata.final_url
    );

    emit_stage(sink, invocation, Stage::Counting);
    let decoded = decode_page(&page.bytes, page.metadata.content_type.as_deref());
    let survey = survey_document(&decoded.html);
    engine_info!(
        "{}: {} images, {} links ({})",
        page.metadata.original_url,
        survey.images.len(),
        survey.anchor_count,
        decoded.encoding_label
    );
    sink.emit(ScrapeEvent::PageCounted {
        invocation,
        images: survey.images.len(),
        links: survey.anchor_count,
    });

    // The directory is prepared even when nothing qualifies, so a
    // successful invocation always leaves it in place.
    ensure_output_dir(&settings.output_dir)?;

    // Sources resolve against the URL as submitted, not a redirect target.
    let base = Url::parse(url)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

    emit_stage(sink, invocation, Stage::Downloading);
    let attempts = harvest_images(
        invocation,
        &base,
        &survey.images,
        settings,
        fetcher,
        sink,
    )
    .await;
    emit_stage(sink, invocation, Stage::Done);

    Ok(ScrapeOutcome {
        page_url: url.to_string(),
        final_url: page.metadata.final_url,
        images_found: survey.images.len(),
        links_found: survey.anchor_count,
        attempts,
    })
}

fn emit_stage(sink: &dyn ProgressSink, invocation: InvocationId, stage: Stage) {
    sink.emit(ScrapeEvent::Progress(ScrapeProgress {
        invocation,
        stage,
        bytes: None,
    }));
}
