//! POSIX `ls -l` style lines
//!
//! ```text
//! {FILE_TYPE}{PERMISSIONS} {LINK_COUNT} {USER} {GROUP} {FILE_SIZE} {MODIFIED_TIME} {FILENAME}
//! -rw-r--r-- 1 user group 1234 Nov 5 13:46 example.txt
//! ```
//!
//! Some servers omit columns before the size, so the date is located by shape rather than by position.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};

use super::time::{is_month, resolve_time};
use super::{tokenize, Entry, FileType, Mode, ModeType, ParseError, ParseResult, Token};
use crate::regex::{ISO_DATE_RE, LS_CLOCK_RE, LS_DAY_RE, LS_NUMBER_RE, LS_YEAR_RE};

/// Separator between a symlink name and its target
const SYMLINK_ARROW: &str = " -> ";

/// Index of the date when all the columns are there (mode, links, user, group, size)
const STANDARD_DATE_INDEX: usize = 5;

/// Parse a POSIX `ls -l` line
pub(crate) fn parse<Tz: TimeZone>(line: &str, now: &DateTime<Tz>) -> ParseResult<Entry<Tz>> {
    let tokens = tokenize(line);
    let mode_token = tokens.first().ok_or(ParseError::UnsupportedLine)?;
    let mode = Mode::from_str(mode_token.text)?;

    let (date_at, date_len) = locate_date(&tokens).ok_or_else(|| {
        debug!("could not locate date in POSIX line {line}");
        ParseError::UnsupportedLine
    })?;
    let date_tokens: Vec<&str> = tokens
        .get(date_at..date_at + date_len)
        .ok_or(ParseError::UnsupportedLine)?
        .iter()
        .map(|token| token.text)
        .collect();
    let modified = resolve_time(&date_tokens, now)?;

    // the name starts after the single separator following the date; everything else is verbatim
    let date_end = tokens[date_at + date_len - 1].end;
    let name_region = line
        .get(date_end + 1..)
        .filter(|region| !region.trim().is_empty())
        .ok_or(ParseError::UnsupportedLine)?;
    let (name, target) = match name_region.split_once(SYMLINK_ARROW) {
        Some((name, target)) => (name, Some(target)),
        None => (name_region, None),
    };
    if name.is_empty() || target.is_some_and(str::is_empty) {
        return Err(ParseError::UnsupportedLine);
    }

    let (file_type, mode) = match (mode.mode_type(), target) {
        (_, Some(target)) => (
            FileType::Symlink(PathBuf::from(target)),
            mode.with_type(ModeType::Symlink),
        ),
        (ModeType::Symlink, None) => (FileType::Symlink(PathBuf::default()), mode),
        (ModeType::Directory, None) => (FileType::Directory, mode),
        (ModeType::Regular, None) => (FileType::File, mode),
    };
    let size = match file_type {
        FileType::File => tokens[date_at - 1]
            .text
            .parse::<u64>()
            .map_err(|_| ParseError::UnsupportedLine)?,
        _ => 0,
    };
    let (owner, group) = match date_at {
        STANDARD_DATE_INDEX => (
            Some(tokens[2].text.to_string()),
            Some(tokens[3].text.to_string()),
        ),
        _ => (None, None),
    };

    trace!(
        "Found file with name {}, type: {:?}, size: {}, owner: {:?}, group: {:?}, mode: {}",
        name,
        file_type,
        size,
        owner,
        group,
        mode
    );
    Ok(Entry {
        name: name.to_string(),
        file_type,
        mode,
        size,
        modified,
        owner,
        group,
    })
}

/// Find where the date starts and how many tokens it spans.
///
/// The standard column layout wins whenever it holds a complete date.
/// Otherwise a date is a month abbreviation (or a `long-iso` date) right after a numeric size column,
/// and candidates which look like a complete date are preferred, so an owner or group named like a month
/// doesn't fool the scan. When nothing looks like a date, the standard column layout is assumed,
/// so that a broken date is reported as such.
fn locate_date(tokens: &[Token<'_>]) -> Option<(usize, usize)> {
    if let Some(standard) = standard_date(tokens) {
        return Some(standard);
    }
    let candidates: Vec<(usize, usize)> = (2..tokens.len())
        .filter(|&i| LS_NUMBER_RE.is_match(tokens[i - 1].text))
        .filter_map(|i| match tokens[i].text {
            month if is_month(month) => Some((i, 3)),
            date if ISO_DATE_RE.is_match(date) => Some((i, 2)),
            _ => None,
        })
        .collect();

    candidates
        .iter()
        .copied()
        .find(|&(at, len)| is_date_shaped(tokens, at, len))
        .or_else(|| candidates.first().copied())
        .or_else(|| {
            (tokens.len() > STANDARD_DATE_INDEX + 3
                && LS_NUMBER_RE.is_match(tokens[STANDARD_DATE_INDEX - 1].text))
            .then_some((STANDARD_DATE_INDEX, 3))
        })
}

/// The date at [`STANDARD_DATE_INDEX`], if the size column is numeric and the date is complete
fn standard_date(tokens: &[Token<'_>]) -> Option<(usize, usize)> {
    if !tokens
        .get(STANDARD_DATE_INDEX - 1)
        .is_some_and(|size| LS_NUMBER_RE.is_match(size.text))
    {
        return None;
    }
    let len = match tokens.get(STANDARD_DATE_INDEX)?.text {
        month if is_month(month) => 3,
        date if ISO_DATE_RE.is_match(date) => 2,
        _ => return None,
    };
    is_date_shaped(tokens, STANDARD_DATE_INDEX, len).then_some((STANDARD_DATE_INDEX, len))
}

fn is_date_shaped(tokens: &[Token<'_>], at: usize, len: usize) -> bool {
    let field = |offset: usize| tokens.get(at + offset).map(|token| token.text);
    match len {
        3 => {
            field(1).is_some_and(|day| LS_DAY_RE.is_match(day))
                && field(2).is_some_and(|year_or_clock| {
                    LS_YEAR_RE.is_match(year_or_clock) || LS_CLOCK_RE.is_match(year_or_clock)
                })
        }
        _ => field(1).is_some_and(|clock| LS_CLOCK_RE.is_match(clock)),
    }
}
