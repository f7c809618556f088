//! Gleaner core: pure state machine for the scrape form and status display.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, DownloadRow, DownloadStatus, InvocationId, ScrapePhase, ScrapeResultKind,
};
pub use update::update;
pub use view_model::ScrapeView;
