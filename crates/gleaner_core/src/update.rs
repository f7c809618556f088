use crate::{AppState, Effect, Msg, ScrapeResultKind};

/// Pure update function: applies a message to state and returns any effects.
///
/// Engine-originated messages carry the invocation id they belong to; events
/// from a superseded invocation are dropped, so a re-submission while a
/// scrape is still running deterministically wins the display.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::ScrapeClicked => {
            let url = state.trimmed_input().to_string();
            if url.is_empty() {
                state.require_url();
                Vec::new()
            } else {
                let invocation = state.begin_scrape();
                vec![Effect::StartScrape { invocation, url }]
            }
        }
        Msg::PageCounted {
            invocation,
            images,
            links,
        } => {
            if state.is_current(invocation) {
                state.apply_counts(images, links);
            }
            Vec::new()
        }
        Msg::DownloadFinished { invocation, row } => {
            if state.is_current(invocation) {
                state.push_download(row);
            }
            Vec::new()
        }
        Msg::ScrapeFinished { invocation, result } => {
            if state.is_current(invocation) {
                match result {
                    ScrapeResultKind::Completed => state.complete(),
                    ScrapeResultKind::Failed { message } => state.fail(message),
                }
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
