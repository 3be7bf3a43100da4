//! Tracing setup for the harness binary.
//!
//! Events go to stderr so stdout only carries the final summary. `RUST_LOG`, when set,
//! replaces the level picked on the command line.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How chatty the harness should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Trace,
}

impl Verbosity {
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Normal,
            (false, 1) => Verbosity::Verbose,
            (false, _) => Verbosity::Trace,
        }
    }

    pub fn directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "hyphen_report=warn",
            Verbosity::Normal => "hyphen_report=info",
            Verbosity::Verbose => "hyphen_report=debug",
            Verbosity::Trace => "hyphen_report=trace",
        }
    }
}

/// Installs the global subscriber. Calling it again is a no-op.
pub fn init(verbosity: Verbosity) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
