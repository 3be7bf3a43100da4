// Regression tests for the hyphen-report binary: exit codes, usage, and on-disk layout.

mod common;

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

use common::{read_log, Workspace};

#[test]
fn no_arguments_prints_usage_and_fails() {
    let mut cmd = Command::cargo_bin("hyphen-report").unwrap();
    cmd.assert()
        .failure()
        .code(1)
        .stderr(contains("Usage").or(contains("usage")));
}

#[test]
fn extra_arguments_are_rejected() {
    let mut cmd = Command::cargo_bin("hyphen-report").unwrap();
    cmd.args(["one.json", "two.json"]);
    cmd.assert().failure().code(1);
}

#[test]
fn help_exits_successfully() {
    let mut cmd = Command::cargo_bin("hyphen-report").unwrap();
    cmd.arg("--help");
    cmd.assert().success().stdout(contains("<CONFIG>"));
}

#[test]
fn unreadable_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("hyphen-report").unwrap();
    cmd.current_dir(dir.path()).arg("missing.json");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(contains("hyphen_report::config"));
    assert!(!dir.path().join("report").exists());
}

#[test]
fn malformed_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.json"), "{\"file_path\": ").unwrap();
    let mut cmd = Command::cargo_bin("hyphen-report").unwrap();
    cmd.current_dir(dir.path()).arg("bad.json");
    cmd.assert().failure().code(1).stderr(contains("malformed JSON"));
}

#[cfg(unix)]
#[test]
fn default_layout_is_used_relative_to_working_directory() {
    let ws = Workspace::new(&["hyph-en.tex", "broken.tex"]);
    let config = ws.write_config(
        "config.json",
        &[("broken.tex", &["hyphen"]), ("hyph-en.tex", &["hyphen", "table"])],
    );

    let mut cmd = Command::cargo_bin("hyphen-report").unwrap();
    cmd.current_dir(ws.path()).arg(&config).arg("-q");
    cmd.assert()
        .success()
        .stdout(contains("Matched:").and(contains("hyphen_report_")));

    assert!(!ws.path().join("out_hpb").exists());
    let reports = ws.report_dirs();
    assert_eq!(reports.len(), 1);
    assert_eq!(read_log(&reports[0], "match.log"), "hyph-en.tex hyphen 1:5 \n");
    assert_eq!(read_log(&reports[0], "unmatch.log"), "hyph-en.tex table\n");
}

#[cfg(unix)]
#[test]
fn command_line_overrides_tool_locations() {
    let ws = Workspace::new(&["hyph-en.tex"]);
    fs::create_dir(ws.path().join("bin")).unwrap();
    fs::rename(ws.path().join("reader"), ws.path().join("bin").join("reader")).unwrap();
    let config = ws.write_config("config.json", &[("hyph-en.tex", &["hyphen"])]);

    let mut cmd = Command::cargo_bin("hyphen-report").unwrap();
    cmd.current_dir(ws.path())
        .arg(&config)
        .args(["--reader", "./bin/reader", "--report-dir", "./reports", "-q"]);
    cmd.assert().success();

    let reports: Vec<_> = fs::read_dir(ws.path().join("reports"))
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    assert_eq!(reports.len(), 1);
    assert_eq!(read_log(&reports[0], "match.log"), "hyph-en.tex hyphen 1:5 \n");
}

#[cfg(unix)]
#[test]
fn yaml_config_is_accepted() {
    let ws = Workspace::new(&["hyph-en.tex"]);
    fs::write(
        ws.path().join("config.yaml"),
        "file_path: ./tex\ntex_files:\n  - filename: hyph-en.tex\n    words: [empty]\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("hyphen-report").unwrap();
    cmd.current_dir(ws.path()).arg("config.yaml").arg("-q");
    cmd.assert().success();

    let reports = ws.report_dirs();
    assert_eq!(read_log(&reports[0], "unmatch.log"), "hyph-en.tex empty\n");
}
