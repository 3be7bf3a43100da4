//! Shared fixtures: a scratch workspace with fake `transform` and `reader` tools.
//!
//! The fake transform writes `<out>/<stem>.hpb` unless the stem starts with `broken`.
//! The fake reader answers from a canned table keyed by word and fails when the
//! compiled file is missing.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const TRANSFORM_SCRIPT: &str = r#"#!/bin/sh
base=$(basename "$1" .tex)
case "$base" in
  broken*) echo "cannot compile $1" >&2; exit 1 ;;
esac
[ -f "$1" ] || { echo "missing $1" >&2; exit 2; }
echo "leaves: 3"
: > "$2/$base.hpb"
"#;

pub const READER_SCRIPT: &str = r#"#!/bin/sh
[ -f "$1" ] || { echo "cannot mmap $1"; exit 1; }
echo "Attempt to mmap $1"
echo "Magic: 62ad5800"
case "$2" in
  hyphen)
    echo "result size: 3 while expecting 3"
    echo "1: 2"; echo "3: 5"; echo "5: 4" ;;
  table)
    echo "result size: 2 while expecting 2"
    echo "74: 0"; echo "61: 2" ;;
  empty)
    echo "result size: 0 while expecting 0" ;;
  skewed)
    echo "result size: 1 while expecting 2"
    echo "73: 1" ;;
  stuck)
    exec sleep 30 ;;
  *)
    echo "no result for $2" ;;
esac
"#;

pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    /// Creates `tex/` with the given source files and installs both fake tools.
    pub fn new(sources: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("tex")).unwrap();
        for name in sources {
            fs::write(dir.path().join("tex").join(name), "\\patterns{ 1ba }\n").unwrap();
        }
        let ws = Self { dir };
        ws.install("transform", TRANSFORM_SCRIPT);
        ws.install("reader", READER_SCRIPT);
        ws
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn install(&self, name: &str, script: &str) {
        let path = self.path().join(name);
        fs::write(&path, script).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    /// Writes a config using relative paths, for runs whose working directory is the workspace.
    pub fn write_config(&self, name: &str, cases: &[(&str, &[&str])]) -> PathBuf {
        let tex_files: Vec<_> = cases
            .iter()
            .map(|(file, words)| serde_json::json!({ "filename": file, "words": words }))
            .collect();
        let config = serde_json::json!({ "file_path": "./tex", "tex_files": tex_files });
        let path = self.path().join(name);
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        path
    }

    /// Report directories created so far, oldest name first.
    pub fn report_dirs(&self) -> Vec<PathBuf> {
        let root = self.path().join("report");
        let mut dirs: Vec<PathBuf> = match fs::read_dir(&root) {
            Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
            Err(_) => Vec::new(),
        };
        dirs.sort();
        dirs
    }
}

pub fn read_log(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap_or_default()
}
