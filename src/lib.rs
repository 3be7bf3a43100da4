//! Regression harness for hyphenation pattern tooling.
//!
//! For every source file in a [`TestConfig`] the external transform tool compiles a
//! `.hpb` pattern file, the reader tool is queried once per configured word, and each
//! answer is classified into `match.log` or `unmatch.log` of a timestamped report
//! directory.

pub use crate::config::{HarnessSettings, TestConfig, TexFileCase};
pub use crate::diagnostics::{HarnessError, Result};
pub use crate::parser::{parse_reader_log, ParseOutcome, ParsedVerdict};
pub use crate::pipeline::{Harness, RunSummary};
pub use crate::process::{CommandLine, ProcessResult, ProcessRunner, SystemRunner};
pub use crate::report::ReportRun;

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod process;
pub mod report;
