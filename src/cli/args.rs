//! Defines the command-line arguments for the harness.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::Parser;
use std::path::PathBuf;

use crate::config::HarnessSettings;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "hyphen-report",
    version,
    about = "Compile hyphenation patterns, query words, and write match/unmatch reports."
)]
pub struct HarnessArgs {
    /// The path to the JSON (or .yaml) test configuration.
    pub config: PathBuf,

    /// Scratch directory for compiled .hpb files (removed after the run).
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Directory under which the timestamped report directory is created.
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Path to the transform executable.
    #[arg(long, value_name = "PATH")]
    pub transform: Option<PathBuf>,

    /// Path to the reader executable.
    #[arg(long, value_name = "PATH")]
    pub reader: Option<PathBuf>,

    /// Seconds before a single tool invocation is killed.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Increase log detail (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl HarnessArgs {
    /// Command-line values win over whatever the configuration file says.
    pub fn apply_overrides(&self, settings: &mut HarnessSettings) {
        if let Some(dir) = &self.out_dir {
            settings.out_dir = dir.clone();
        }
        if let Some(dir) = &self.report_dir {
            settings.report_dir = dir.clone();
        }
        if let Some(path) = &self.transform {
            settings.transform = path.clone();
        }
        if let Some(path) = &self.reader {
            settings.reader = path.clone();
        }
        if let Some(secs) = self.timeout {
            settings.timeout_secs = secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_positional_is_required() {
        assert!(HarnessArgs::try_parse_from(["hyphen-report"]).is_err());
        assert!(HarnessArgs::try_parse_from(["hyphen-report", "a.json", "b.json"]).is_err());
        let args = HarnessArgs::try_parse_from(["hyphen-report", "a.json"]).unwrap();
        assert_eq!(args.config, PathBuf::from("a.json"));
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let args = HarnessArgs::try_parse_from([
            "hyphen-report",
            "cfg.json",
            "--reader",
            "bin/reader",
            "--timeout",
            "7",
        ])
        .unwrap();
        let mut settings = HarnessSettings::default();
        args.apply_overrides(&mut settings);
        assert_eq!(settings.reader, PathBuf::from("bin/reader"));
        assert_eq!(settings.timeout_secs, 7);
        assert_eq!(settings.transform, HarnessSettings::default().transform);
    }
}
