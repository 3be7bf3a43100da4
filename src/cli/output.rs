//! Handles all user-facing output for the CLI.
//!
//! Progress goes through `tracing`; this module only prints the end-of-run summary,
//! colored when stdout is a terminal.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::pipeline::RunSummary;

fn color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Prints the run summary to stdout.
pub fn print_summary(summary: &RunSummary) {
    let mut stdout = StandardStream::stdout(color_choice());
    let _ = write_summary(&mut stdout, summary);
}

/// Writes the run summary to any color-capable writer.
pub fn write_summary<W: WriteColor>(out: &mut W, summary: &RunSummary) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "\nHyphenation report summary")?;
    out.reset()?;
    writeln!(out, "══════════════════════════")?;

    write_count(out, "Files compiled", summary.files_compiled, None)?;
    write_count(out, "Files skipped", summary.files_skipped, Some(Color::Yellow))?;
    write_count(out, "Matched", summary.matched, Some(Color::Green))?;
    write_count(out, "Unmatched", summary.unmatched, Some(Color::Red))?;
    write_count(out, "No verdict", summary.dropped, Some(Color::Yellow))?;
    write_count(out, "Query failures", summary.query_failures, Some(Color::Yellow))?;

    writeln!(out, "\nReport: {}", summary.report_dir.display())
}

fn write_count<W: WriteColor>(out: &mut W, label: &str, count: usize, color: Option<Color>) -> io::Result<()> {
    if count > 0 {
        out.set_color(ColorSpec::new().set_fg(color))?;
    }
    writeln!(out, "{:<16}{}", format!("{}:", label), count)?;
    out.reset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use termcolor::NoColor;

    #[test]
    fn summary_lists_counts_and_report_dir() {
        let summary = RunSummary {
            report_dir: PathBuf::from("report/hyphen_report_20240101_000000"),
            files_compiled: 2,
            files_skipped: 1,
            matched: 3,
            unmatched: 4,
            dropped: 0,
            query_failures: 0,
        };
        let mut out = NoColor::new(Vec::new());
        write_summary(&mut out, &summary).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();

        assert!(text.contains("Matched:        3"));
        assert!(text.contains("Unmatched:      4"));
        assert!(text.contains("Files skipped:  1"));
        assert!(text.contains("Report: report/hyphen_report_20240101_000000"));
    }
}
