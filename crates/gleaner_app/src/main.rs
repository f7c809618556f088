//! `gleaner`: fetch a page, report its `img`/`a` tag counts, and download
//! the allow-listed images into a numbered directory.

mod cli;
mod effects;
mod logging;
mod render;
mod report;

use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use gleaner_core::{update, AppState, Msg, ScrapePhase};
use log::LevelFilter;

use crate::cli::Cli;
use crate::effects::EffectRunner;
use crate::logging::LogDestination;
use crate::render::StdoutRenderer;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.verbose {
        logging::initialize(LogDestination::Both, LevelFilter::Debug);
    } else {
        logging::initialize(LogDestination::File, LevelFilter::Info);
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("gleaner error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut renderer = StdoutRenderer::new();
    let mut state = AppState::new();

    // The same two messages a form would deliver.
    let (next, _) = update(state, Msg::InputChanged(cli.url.clone()));
    state = next;
    let (next, effects) = update(state, Msg::ScrapeClicked);
    state = next;

    if state.consume_dirty() {
        renderer.render(&state.view());
    }

    if effects.is_empty() {
        // Validation stopped the pipeline before any network traffic.
        return Ok(ExitCode::from(2));
    }

    let runner = EffectRunner::new(cli.engine_config());
    runner.run(effects);

    while !matches!(
        state.phase(),
        ScrapePhase::Complete | ScrapePhase::Failed
    ) {
        let event = runner
            .next_event()
            .ok_or_else(|| anyhow!("engine worker stopped unexpectedly"))?;
        let (next, more) = update(state, effects::map_event(event));
        state = next;
        runner.run(more);
        if state.consume_dirty() {
            renderer.render(&state.view());
        }
    }

    let view = state.view();
    if cli.json {
        println!("{}", report::render_report(&view)?);
    }
    Ok(match view.phase {
        ScrapePhase::Complete => ExitCode::SUCCESS,
        _ => ExitCode::from(1),
    })
}
