//! Command-line surface of the `gleaner` binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use gleaner_engine::{EngineConfig, SlotPolicy, DEFAULT_OUTPUT_DIR};

/// Fetch a page, report how many `img` and `a` tags it has, and download
/// the allow-listed images into a numbered directory.
#[derive(Debug, Parser)]
#[command(name = "gleaner")]
#[command(about = "Count a page's img/a tags and harvest its images", long_about = None)]
pub struct Cli {
    /// Page URL to scrape. Whitespace-only input is rejected before any
    /// network traffic.
    pub url: String,

    /// Directory the images land in.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// How download failures interact with the image_<n> numbering.
    #[arg(long, value_enum, default_value_t = SlotPolicyArg::OnSuccess)]
    pub slot_policy: SlotPolicyArg,

    /// Whole-request deadline in seconds; waits indefinitely when absent.
    #[arg(long, value_name = "N")]
    pub timeout_secs: Option<u64>,

    /// Print a JSON report of the invocation after the run.
    #[arg(long)]
    pub json: bool,

    /// Log to the terminal as well as ./gleaner.log, at debug level.
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SlotPolicyArg {
    /// A failed download hands its number to the next success.
    OnSuccess,
    /// A failed download burns its number, leaving a gap.
    PerAttempt,
}

impl From<SlotPolicyArg> for SlotPolicy {
    fn from(arg: SlotPolicyArg) -> Self {
        match arg {
            SlotPolicyArg::OnSuccess => SlotPolicy::OnSuccess,
            SlotPolicyArg::PerAttempt => SlotPolicy::PerAttempt,
        }
    }
}

impl Cli {
    /// Engine settings implied by the flags.
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default_with_output(self.out_dir.clone());
        config.harvest.slot_policy = self.slot_policy.into();
        config.fetch.request_timeout = self.timeout_secs.map(Duration::from_secs);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_the_plain_invocation() {
        let cli = Cli::parse_from(["gleaner", "http://site.test/page"]);
        assert_eq!(cli.url, "http://site.test/page");
        assert_eq!(cli.out_dir, PathBuf::from("downloaded_images"));
        assert_eq!(cli.slot_policy, SlotPolicyArg::OnSuccess);
        assert_eq!(cli.timeout_secs, None);
        assert!(!cli.json);
        assert!(!cli.verbose);

        let config = cli.engine_config();
        assert_eq!(config.fetch.user_agent, "Mozilla/5.0");
        assert_eq!(config.fetch.request_timeout, None);
        assert_eq!(config.harvest.slot_policy, SlotPolicy::OnSuccess);
    }

    #[test]
    fn flags_reach_the_engine_config() {
        let cli = Cli::parse_from([
            "gleaner",
            "http://site.test",
            "--out-dir",
            "elsewhere",
            "--slot-policy",
            "per-attempt",
            "--timeout-secs",
            "30",
            "--json",
        ]);
        let config = cli.engine_config();
        assert_eq!(config.harvest.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(config.harvest.slot_policy, SlotPolicy::PerAttempt);
        assert_eq!(
            config.fetch.request_timeout,
            Some(Duration::from_secs(30))
        );
        assert!(cli.json);
    }

    #[test]
    fn a_whitespace_url_is_still_accepted_by_the_parser() {
        // Validation is the state machine's job, not clap's.
        let cli = Cli::parse_from(["gleaner", "   "]);
        assert_eq!(cli.url, "   ");
    }
}
