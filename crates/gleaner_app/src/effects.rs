//! Runs core effects through the engine and maps engine events back into
//! core messages.

use engine_logging::{engine_info, engine_warn};
use gleaner_core::{DownloadRow, DownloadStatus, Effect, Msg, ScrapeResultKind};
use gleaner_engine::{EngineConfig, EngineHandle, ImageAttempt, ImageOutcome, ScrapeEvent};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: EngineHandle::new(config),
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartScrape { invocation, url } => {
                    engine_info!("StartScrape invocation={invocation} url={url}");
                    self.engine.submit(invocation, url);
                }
            }
        }
    }

    /// Blocking wait for the next engine event; `None` once the worker is
    /// gone.
    pub fn next_event(&self) -> Option<ScrapeEvent> {
        self.engine.recv()
    }
}

/// Translate one engine event into the message the core understands.
pub fn map_event(event: ScrapeEvent) -> Msg {
    match event {
        ScrapeEvent::Progress(_) => Msg::NoOp,
        ScrapeEvent::PageCounted {
            invocation,
            images,
            links,
        } => Msg::PageCounted {
            invocation,
            images,
            links,
        },
        ScrapeEvent::ImageFinished { invocation, attempt } => Msg::DownloadFinished {
            invocation,
            row: attempt_row(attempt),
        },
        ScrapeEvent::Finished { invocation, result } => {
            let result = match result {
                Ok(outcome) => {
                    engine_info!(
                        "invocation {invocation} complete: {}/{} images saved",
                        outcome.downloaded(),
                        outcome.images_found
                    );
                    ScrapeResultKind::Completed
                }
                Err(failure) => {
                    engine_warn!("invocation {invocation} failed: {failure}");
                    ScrapeResultKind::Failed {
                        message: failure.message,
                    }
                }
            };
            Msg::ScrapeFinished { invocation, result }
        }
    }
}

fn attempt_row(attempt: ImageAttempt) -> DownloadRow {
    let url = attempt.resolved_url.or(attempt.source);
    let status = match attempt.outcome {
        ImageOutcome::Downloaded { path } => DownloadStatus::Saved {
            file: path.display().to_string(),
        },
        ImageOutcome::Skipped { reason } => DownloadStatus::Skipped {
            reason: reason.to_string(),
        },
        ImageOutcome::Failed { error } => DownloadStatus::Failed { error },
    };
    DownloadRow {
        index: attempt.index,
        url,
        status,
    }
}
