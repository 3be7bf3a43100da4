//! Report runs: one timestamped directory per harness invocation holding
//! `match.log` and `unmatch.log`.
//!
//! Every record opens its log in append mode, writes one line and closes the file
//! again, so an interrupted run leaves a complete prefix on disk.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::diagnostics::{HarnessError, Result};
use crate::parser::ParsedVerdict;

pub const MATCH_LOG: &str = "match.log";
pub const UNMATCH_LOG: &str = "unmatch.log";
pub const REPORT_PREFIX: &str = "hyphen_report_";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Which of the two logs a verdict went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Matched,
    Unmatched,
}

/// The directory and logs owned by a single harness invocation.
#[derive(Debug)]
pub struct ReportRun {
    dir: PathBuf,
    timestamp: String,
}

impl ReportRun {
    /// Creates a fresh report directory under `root`, named after `now`.
    pub fn create(root: &Path, now: DateTime<Local>) -> Result<Self> {
        Self::create_with_timestamp(root, &now.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Creates `<root>/hyphen_report_<timestamp>`. If that name is taken, `_1`, `_2`, ...
    /// are appended until a free name is found; an existing run is never reused.
    pub fn create_with_timestamp(root: &Path, timestamp: &str) -> Result<Self> {
        fs::create_dir_all(root).map_err(|e| HarnessError::io(root, e))?;

        let base = format!("{}{}", REPORT_PREFIX, timestamp);
        let mut attempt = 0usize;
        loop {
            let name = if attempt == 0 {
                base.clone()
            } else {
                format!("{}_{}", base, attempt)
            };
            let dir = root.join(name);
            match fs::create_dir(&dir) {
                Ok(()) => {
                    debug!(dir = %dir.display(), "created report directory");
                    return Ok(Self {
                        dir,
                        timestamp: timestamp.to_string(),
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(HarnessError::io(dir, e)),
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn match_log(&self) -> PathBuf {
        self.dir.join(MATCH_LOG)
    }

    pub fn unmatch_log(&self) -> PathBuf {
        self.dir.join(UNMATCH_LOG)
    }

    /// Appends the verdict for `(tex_file, word)` to the matching log.
    pub fn record(&self, tex_file: &str, word: &str, verdict: &ParsedVerdict) -> Result<Classification> {
        let (path, line, class) = if verdict.matched {
            (
                self.match_log(),
                format!("{} {} {}\n", tex_file, word, verdict.result_summary),
                Classification::Matched,
            )
        } else {
            (
                self.unmatch_log(),
                format!("{} {}\n", tex_file, word),
                Classification::Unmatched,
            )
        };
        append_line(&path, &line).map_err(|source| HarnessError::Report { path, source })?;
        Ok(class)
    }
}

fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.flush()
}
