//! Test matrix and harness settings.
//!
//! The configuration file is JSON by default; a `.yaml` or `.yml` extension selects
//! YAML with the same schema:
//!
//! ```json
//! {
//!   "file_path": "./tex",
//!   "tex_files": [
//!     { "filename": "hyph-en-us.tex", "words": ["hyphenation", "example"] }
//!   ],
//!   "harness": { "out_dir": "./out_hpb", "timeout_secs": 30 }
//! }
//! ```
//!
//! The `harness` table is optional; every field in it has a default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::diagnostics::{HarnessError, Result};

pub const DEFAULT_OUT_DIR: &str = "./out_hpb";
pub const DEFAULT_REPORT_DIR: &str = "./report";
pub const DEFAULT_TRANSFORM: &str = "./transform";
pub const DEFAULT_READER: &str = "./reader";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Extension of the compiled pattern files the transform tool writes.
pub const COMPILED_EXTENSION: &str = "hpb";

/// One source file and the words to query against its compiled form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TexFileCase {
    pub filename: String,
    pub words: Vec<String>,
}

impl TexFileCase {
    /// Path of the source file handed to the transform tool.
    pub fn source_path(&self, file_path: &Path) -> PathBuf {
        file_path.join(&self.filename)
    }

    /// Path of the `.hpb` file the transform tool is expected to produce.
    pub fn compiled_path(&self, out_dir: &Path) -> PathBuf {
        let mut name = Path::new(&self.filename)
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| self.filename.clone().into());
        name.push(".");
        name.push(COMPILED_EXTENSION);
        out_dir.join(name)
    }
}

/// Working directories, tool locations and limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HarnessSettings {
    /// Scratch directory for compiled pattern files, removed after the run.
    pub out_dir: PathBuf,
    /// Root under which each run creates its own `hyphen_report_<timestamp>` directory.
    pub report_dir: PathBuf,
    pub transform: PathBuf,
    pub reader: PathBuf,
    /// Upper bound for a single external invocation.
    pub timeout_secs: u64,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            transform: PathBuf::from(DEFAULT_TRANSFORM),
            reader: PathBuf::from(DEFAULT_READER),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HarnessSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// The whole test matrix, loaded once and never mutated during a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestConfig {
    pub file_path: PathBuf,
    pub tex_files: Vec<TexFileCase>,
    #[serde(default)]
    pub harness: HarnessSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }
}

impl TestConfig {
    /// Reads and validates the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HarnessError::config_with_source(path, "cannot read configuration file", e)
        })?;
        Self::from_str_with_format(&content, path, ConfigFormat::for_path(path))
    }

    /// Parses JSON configuration text; `origin` is only used in error messages.
    pub fn from_json(content: &str, origin: &Path) -> Result<Self> {
        Self::from_str_with_format(content, origin, ConfigFormat::Json)
    }

    fn from_str_with_format(content: &str, origin: &Path, format: ConfigFormat) -> Result<Self> {
        let config: TestConfig = match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| {
                HarnessError::config_with_source(origin, "malformed JSON configuration", e)
            })?,
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
                HarnessError::config_with_source(origin, "malformed YAML configuration", e)
            })?,
        };
        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &Path) -> Result<()> {
        if let Some(position) = self.tex_files.iter().position(|c| c.filename.trim().is_empty()) {
            return Err(HarnessError::config(
                origin,
                format!("tex_files[{}] has an empty filename", position),
            ));
        }
        Ok(())
    }

    /// Total number of (file, word) pairs in the matrix.
    pub fn word_count(&self) -> usize {
        self.tex_files.iter().map(|c| c.words.len()).sum()
    }
}
