//! The hyphen-report command-line interface.
//!
//! Parses arguments, loads the configuration, runs the harness against the real
//! external tools and prints a summary. Usage and configuration errors exit with 1;
//! per-case failures never change the exit code.

use std::process;

use clap::Parser;
use tracing::info;

use crate::cli::args::HarnessArgs;
use crate::config::TestConfig;
use crate::diagnostics::{print_error, Result};
use crate::logging::{self, Verbosity};
use crate::pipeline::{Harness, RunSummary};
use crate::process::SystemRunner;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = match HarnessArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    logging::init(Verbosity::from_flags(args.verbose, args.quiet));

    match execute(&args) {
        Ok(summary) => output::print_summary(&summary),
        Err(e) => {
            print_error(e);
            process::exit(1);
        }
    }
}

/// Loads the configuration named by `args` and performs one full run.
pub fn execute(args: &HarnessArgs) -> Result<RunSummary> {
    let mut config = TestConfig::load(&args.config)?;
    args.apply_overrides(&mut config.harness);
    info!(config = %args.config.display(), "loaded configuration");

    let runner = SystemRunner::new(config.harness.timeout());
    Harness::new(config, runner).run()
}
