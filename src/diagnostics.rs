//! # Overview
//!
//! Unified, `miette`-based error type for the harness. Only failures that end a run
//! (or that a caller must decide about, such as a failed spawn) become a
//! [`HarnessError`]. Expected negative outcomes like a non-zero exit from the transform
//! tool or a reader log without a verdict are ordinary values, not errors.
//!
//! Errors are rendered once, at the CLI boundary, through [`miette::Report`].

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = HarnessError> = std::result::Result<T, E>;

/// Coarse classification of a [`HarnessError`], mostly for tests and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Io,
    Spawn,
    Report,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Io => "io",
            ErrorKind::Spawn => "spawn",
            ErrorKind::Report => "report",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    /// The configuration file could not be read or does not describe a test matrix.
    #[error("Configuration error in '{path}': {message}")]
    #[diagnostic(
        code(hyphen_report::config),
        help("the file must hold `file_path` and a `tex_files` list of `filename`/`words` entries")
    )]
    Config {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    /// A filesystem operation on a working directory failed.
    #[error("I/O error on '{path}': {source}")]
    #[diagnostic(code(hyphen_report::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external tool could not be started at all.
    #[error("Failed to start '{program}': {source}")]
    #[diagnostic(
        code(hyphen_report::spawn),
        help("check that the executable exists and is marked executable")
    )]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Appending to a report log failed; the run stops so the log keeps a clean prefix.
    #[error("Failed to write report '{path}': {source}")]
    #[diagnostic(code(hyphen_report::report))]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarnessError::Config { .. } => ErrorKind::Config,
            HarnessError::Io { .. } => ErrorKind::Io,
            HarnessError::Spawn { .. } => ErrorKind::Spawn,
            HarnessError::Report { .. } => ErrorKind::Report,
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        HarnessError::Config {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn config_with_source<E>(path: impl Into<PathBuf>, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HarnessError::Config {
            path: path.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Renders an error with miette's graphical handler on stderr.
pub fn print_error(error: HarnessError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
