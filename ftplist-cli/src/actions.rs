//! # Actions
//!
//! Reads a listing and prints the parsed entries

use std::io::{self, BufRead, Write};

use chrono::{FixedOffset, SecondsFormat};
use ftplist::list::is_listing_header;
use ftplist::{Entry, ListParser, ParseError};

/// How a listing went
#[derive(Debug, Default, Eq, PartialEq)]
pub struct Summary {
    pub parsed: usize,
    pub rejected: usize,
}

/// Errors which stop the listing
#[derive(Debug)]
pub enum ListingError {
    Io(io::Error),
    /// A line couldn't be parsed while in strict mode
    Rejected {
        line_no: usize,
        line: String,
        error: ParseError,
    },
}

impl From<io::Error> for ListingError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Parse each line from `reader`, writing entries to `out` and rejections to `err`.
///
/// `total N` headers are skipped silently. In `strict` mode the first rejected line aborts the listing.
pub fn parse_listing(
    parser: &ListParser<FixedOffset>,
    reader: impl BufRead,
    mut out: impl Write,
    mut err: impl Write,
    strict: bool,
) -> Result<Summary, ListingError> {
    let mut summary = Summary::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line.trim().is_empty() || is_listing_header(&line) {
            debug!("skipping line {line_no}");
            continue;
        }
        match parser.parse_line(&line) {
            Ok(entry) => {
                writeln!(out, "{}", render(&entry))?;
                summary.parsed += 1;
            }
            Err(error) if strict => {
                return Err(ListingError::Rejected {
                    line_no,
                    line,
                    error,
                })
            }
            Err(error) => {
                warn!("line {line_no} rejected: {error}");
                writeln!(err, "line {line_no}: {error}: {line}")?;
                summary.rejected += 1;
            }
        }
    }
    info!(
        "parsed {} entries; rejected {} lines",
        summary.parsed, summary.rejected
    );
    Ok(summary)
}

/// Render an entry as `{mode} {size} {mtime} {name}[ -> {target}]`
pub fn render(entry: &Entry<FixedOffset>) -> String {
    let mut rendered = format!(
        "{} {:>12} {} {}",
        entry.mode(),
        entry.size(),
        entry
            .modified()
            .to_rfc3339_opts(SecondsFormat::Secs, false),
        entry.name()
    );
    if let Some(target) = entry.symlink().filter(|target| !target.as_os_str().is_empty()) {
        rendered.push_str(&format!(" -> {}", target.display()));
    }
    rendered
}
