//! Worker-thread bridge so synchronous frontends can drive the async
//! pipeline: commands in through a channel, [`ScrapeEvent`]s back out.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_error};

use crate::fetch::{ChannelProgressSink, FetchSettings, ProgressSink, ReqwestFetcher};
use crate::harvest::HarvestSettings;
use crate::scrape::scrape;
use crate::types::{InvocationId, ScrapeEvent, ScrapeProgress, Stage};

/// Engine-wide settings: one block for the HTTP layer, one for the image
/// batch.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub harvest: HarvestSettings,
}

impl EngineConfig {
    /// Defaults with only the output directory swapped out.
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        let mut config = Self::default();
        config.harvest.output_dir = output_dir;
        config
    }
}

enum EngineCommand {
    Scrape {
        invocation: InvocationId,
        url: String,
    },
}

/// Handle to the engine worker. Dropping it closes the command channel and
/// the worker exits after finishing the invocation in flight.
///
/// Invocations run strictly one after another, in submission order; events
/// for a later submission never interleave with an earlier one's.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<ScrapeEvent>,
}

impl EngineHandle {
    /// Spawn the worker thread with its own tokio runtime.
    pub fn new(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel::<ScrapeEvent>();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("engine worker could not start a runtime: {err}");
                    return;
                }
            };
            let fetcher = ReqwestFetcher::new(config.fetch.clone());

            while let Ok(EngineCommand::Scrape { invocation, url }) = cmd_rx.recv() {
                engine_debug!("invocation {invocation}: scraping {url}");
                let sink = ChannelProgressSink::new(event_tx.clone());
                sink.emit(ScrapeEvent::Progress(ScrapeProgress {
                    invocation,
                    stage: Stage::Queued,
                    bytes: None,
                }));
                let result = runtime
                    .block_on(scrape(invocation, &url, &config.harvest, &fetcher, &sink))
                    .map_err(|err| err.to_failure());
                let _ = event_tx.send(ScrapeEvent::Finished { invocation, result });
            }
            engine_debug!("engine worker shutting down");
        });

        Self { cmd_tx, event_rx }
    }

    /// Queue one invocation. Returns immediately; everything it produces
    /// arrives as events.
    pub fn submit(&self, invocation: InvocationId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Scrape {
            invocation,
            url: url.into(),
        });
    }

    /// Non-blocking poll, for frontends with their own event loop.
    pub fn try_recv(&self) -> Option<ScrapeEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocking receive. `None` means the worker is gone and no more
    /// events will ever arrive.
    pub fn recv(&self) -> Option<ScrapeEvent> {
        self.event_rx.recv().ok()
    }

    /// Blocking receive with a deadline, for frontends without one.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ScrapeEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}
