//! Classification of reader output.
//!
//! The reader prints a lot of tracing noise. The only part that matters is a line of
//! the form `result size: N while expecting M`, followed by `N` lines of
//! `<hex code>: <decimal value>`. An odd value marks a hyphenation point, and one odd
//! value anywhere is enough to call the word a pattern match.
//!
//! Parsing is best effort. Lines of the wrong shape are skipped, and a log without a
//! usable `result size` line yields no verdict instead of an error.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static RESULT_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^result size: (\d+) while expecting (\d+)").expect("valid regex"));

static KEY_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9a-fA-F]+): (\d+)").expect("valid regex"));

/// Match classification for one (file, word) query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedVerdict {
    pub matched: bool,
    /// `"<index>:<value> "` for every odd value, in parse order. Empty when unmatched.
    pub result_summary: String,
}

/// What the parser made of a reader log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Verdict(ParsedVerdict),
    /// No line announced the result size.
    MissingResultSize,
    /// The reader produced a different number of entries than the word has positions.
    SizeMismatch { result: usize, expected: usize },
    /// The first `result size` line carried a count too large to index the log.
    OversizedResultSize,
}

impl ParseOutcome {
    pub fn verdict(&self) -> Option<&ParsedVerdict> {
        match self {
            ParseOutcome::Verdict(verdict) => Some(verdict),
            _ => None,
        }
    }

    pub fn into_verdict(self) -> Option<ParsedVerdict> {
        match self {
            ParseOutcome::Verdict(verdict) => Some(verdict),
            _ => None,
        }
    }
}

impl fmt::Display for ParseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseOutcome::Verdict(v) if v.matched => write!(f, "matched ({})", v.result_summary.trim_end()),
            ParseOutcome::Verdict(_) => write!(f, "unmatched"),
            ParseOutcome::MissingResultSize => write!(f, "no result size line"),
            ParseOutcome::SizeMismatch { result, expected } => {
                write!(f, "result size {} while expecting {}", result, expected)
            }
            ParseOutcome::OversizedResultSize => write!(f, "result size out of range"),
        }
    }
}

/// Parses the stdout of one reader invocation.
pub fn parse_reader_log(log: &str) -> ParseOutcome {
    let lines: Vec<&str> = log.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        let Some(sizes) = result_size(line) else {
            continue;
        };
        let Some((result, expected)) = sizes else {
            return ParseOutcome::OversizedResultSize;
        };
        if result != expected {
            return ParseOutcome::SizeMismatch { result, expected };
        }

        let window_end = (i + 1).saturating_add(result).min(lines.len());
        let entries = lines[i + 1..window_end].iter().filter_map(|l| key_value(l));
        return ParseOutcome::Verdict(classify(entries));
    }

    ParseOutcome::MissingResultSize
}

fn classify(values: impl Iterator<Item = u64>) -> ParsedVerdict {
    let mut verdict = ParsedVerdict::default();
    for (index, value) in values.enumerate() {
        if value % 2 == 1 {
            verdict.matched = true;
            verdict.result_summary.push_str(&format!("{}:{} ", index, value));
        }
    }
    verdict
}

/// `None` when the line is not a header; `Some(None)` when it is but a count overflows.
fn result_size(line: &str) -> Option<Option<(usize, usize)>> {
    let caps = RESULT_SIZE.captures(line)?;
    let result = caps[1].parse().ok();
    let expected = caps[2].parse().ok();
    Some(result.zip(expected))
}

fn key_value(line: &str) -> Option<u64> {
    let caps = KEY_VALUE.captures(line)?;
    caps[2].parse().ok()
}
