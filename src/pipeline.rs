//! # Harness Pipeline
//!
//! A run walks the test matrix as a two-stage pipeline:
//!
//! 1. **Compile**: the transform tool turns `<file_path>/<filename>` into
//!    `<out_dir>/<stem>.hpb`. Any failure here skips the whole file.
//! 2. **Query**: for each word the reader tool is run against the compiled file and its
//!    output is parsed into a verdict, which is then recorded in the report.
//!
//! Stages return typed outcomes instead of errors so the orchestrator can decide per
//! file and per word what to skip. Only report I/O aborts a run. The scratch directory
//! is removed afterwards either way.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::config::{HarnessSettings, TestConfig, TexFileCase};
use crate::diagnostics::{HarnessError, Result};
use crate::parser::{parse_reader_log, ParseOutcome, ParsedVerdict};
use crate::process::{CommandLine, ProcessRunner};
use crate::report::{Classification, ReportRun};

// =============================================================================
// STAGE RESULTS
// =============================================================================

/// A pattern file the transform tool produced for one configured source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    pub tex_file: String,
    pub path: PathBuf,
}

/// Result of the compile stage for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    Compiled(CompiledPattern),
    Failed { exit_code: i32, stderr: String },
    TimedOut,
    SpawnFailed(String),
}

/// Result of the query stage for one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Classified(ParsedVerdict),
    /// The reader ran but its log carried no usable result; nothing is recorded.
    NoVerdict(ParseOutcome),
    TimedOut,
    SpawnFailed(String),
}

/// Counters for everything that happened during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub report_dir: PathBuf,
    pub files_compiled: usize,
    pub files_skipped: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub dropped: usize,
    pub query_failures: usize,
}

impl RunSummary {
    fn new(report_dir: PathBuf) -> Self {
        Self {
            report_dir,
            files_compiled: 0,
            files_skipped: 0,
            matched: 0,
            unmatched: 0,
            dropped: 0,
            query_failures: 0,
        }
    }

    /// Number of lines written across both logs.
    pub fn classified(&self) -> usize {
        self.matched + self.unmatched
    }
}

// =============================================================================
// STAGES
// =============================================================================

/// Runs the transform tool for `case`.
pub fn compile<R: ProcessRunner + ?Sized>(
    runner: &R,
    settings: &HarnessSettings,
    file_path: &Path,
    case: &TexFileCase,
) -> CompileOutcome {
    let command = CommandLine::new(&settings.transform)
        .arg(case.source_path(file_path))
        .arg(&settings.out_dir);

    info!(tex_file = %case.filename, "running transform");
    match runner.run(&command) {
        Ok(result) if result.timed_out => CompileOutcome::TimedOut,
        Ok(result) if result.exit_code != 0 => CompileOutcome::Failed {
            exit_code: result.exit_code,
            stderr: result.stderr,
        },
        Ok(_) => CompileOutcome::Compiled(CompiledPattern {
            tex_file: case.filename.clone(),
            path: case.compiled_path(&settings.out_dir),
        }),
        Err(e) => CompileOutcome::SpawnFailed(e.to_string()),
    }
}

/// Runs the reader tool for `word` and parses what it printed.
pub fn query<R: ProcessRunner + ?Sized>(
    runner: &R,
    settings: &HarnessSettings,
    pattern: &CompiledPattern,
    word: &str,
) -> QueryOutcome {
    let command = CommandLine::new(&settings.reader)
        .arg(&pattern.path)
        .arg(word);

    info!(tex_file = %pattern.tex_file, word, "running reader");
    let result = match runner.run(&command) {
        Ok(result) => result,
        Err(e) => return QueryOutcome::SpawnFailed(e.to_string()),
    };
    if result.timed_out {
        return QueryOutcome::TimedOut;
    }
    debug!(tex_file = %pattern.tex_file, word, exit_code = result.exit_code, output = %result.stdout, "reader output");

    match parse_reader_log(&result.stdout) {
        ParseOutcome::Verdict(verdict) => QueryOutcome::Classified(verdict),
        other => QueryOutcome::NoVerdict(other),
    }
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

/// Drives a whole run over a loaded [`TestConfig`].
pub struct Harness<R> {
    config: TestConfig,
    runner: R,
}

impl<R: ProcessRunner> Harness<R> {
    pub fn new(config: TestConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn settings(&self) -> &HarnessSettings {
        &self.config.harness
    }

    /// Runs every configured case, stamping the report with the current local time.
    pub fn run(&self) -> Result<RunSummary> {
        self.run_at(Local::now())
    }

    /// Creates the scratch directory, then the report directory, then runs. Nothing is
    /// left in the report root when the scratch directory cannot be created.
    pub fn run_at(&self, now: DateTime<Local>) -> Result<RunSummary> {
        self.prepare_scratch()?;
        let report = match ReportRun::create(&self.settings().report_dir, now) {
            Ok(report) => report,
            Err(e) => {
                self.cleanup();
                return Err(e);
            }
        };
        self.run_into(&report)
    }

    /// Runs every configured case into an already created report.
    pub fn run_into(&self, report: &ReportRun) -> Result<RunSummary> {
        self.prepare_scratch()?;
        info!(
            report_dir = %report.dir().display(),
            timestamp = report.timestamp(),
            files = self.config.tex_files.len(),
            words = self.config.word_count(),
            "starting run"
        );

        let result = self.process_cases(report);
        self.cleanup();
        result
    }

    fn process_cases(&self, report: &ReportRun) -> Result<RunSummary> {
        let settings = self.settings();
        let mut summary = RunSummary::new(report.dir().to_path_buf());

        for case in &self.config.tex_files {
            let pattern = match compile(&self.runner, settings, &self.config.file_path, case) {
                CompileOutcome::Compiled(pattern) => pattern,
                skipped => {
                    log_compile_skip(&case.filename, &skipped);
                    summary.files_skipped += 1;
                    continue;
                }
            };
            summary.files_compiled += 1;

            for word in &case.words {
                match query(&self.runner, settings, &pattern, word) {
                    QueryOutcome::Classified(verdict) => {
                        match report.record(&case.filename, word, &verdict)? {
                            Classification::Matched => summary.matched += 1,
                            Classification::Unmatched => summary.unmatched += 1,
                        }
                    }
                    QueryOutcome::NoVerdict(reason) => {
                        debug!(tex_file = %case.filename, word = %word, %reason, "no verdict recorded");
                        summary.dropped += 1;
                    }
                    QueryOutcome::TimedOut => {
                        warn!(tex_file = %case.filename, word = %word, "reader timed out, skipping word");
                        summary.query_failures += 1;
                    }
                    QueryOutcome::SpawnFailed(message) => {
                        warn!(tex_file = %case.filename, word = %word, %message, "reader could not be started, skipping word");
                        summary.query_failures += 1;
                    }
                }
            }
        }

        info!(
            matched = summary.matched,
            unmatched = summary.unmatched,
            dropped = summary.dropped,
            skipped_files = summary.files_skipped,
            "run finished"
        );
        Ok(summary)
    }

    fn prepare_scratch(&self) -> Result<()> {
        let out_dir = &self.settings().out_dir;
        fs::create_dir_all(out_dir).map_err(|e| HarnessError::io(out_dir, e))
    }

    fn cleanup(&self) {
        let out_dir = &self.settings().out_dir;
        info!(out_dir = %out_dir.display(), "removing compiled patterns");
        match fs::remove_dir_all(out_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(out_dir = %out_dir.display(), error = %e, "failed to remove scratch directory"),
        }
    }
}

fn log_compile_skip(tex_file: &str, outcome: &CompileOutcome) {
    match outcome {
        CompileOutcome::Failed { exit_code, stderr } => {
            warn!(tex_file, exit_code, stderr = %stderr.trim_end(), "transform failed, skipping file")
        }
        CompileOutcome::TimedOut => warn!(tex_file, "transform timed out, skipping file"),
        CompileOutcome::SpawnFailed(message) => {
            warn!(tex_file, %message, "transform could not be started, skipping file")
        }
        CompileOutcome::Compiled(_) => {}
    }
}
