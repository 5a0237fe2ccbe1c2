//! # Time
//!
//! Resolution of the dates found in listing lines into absolute timestamps.
//!
//! Supported shapes:
//!
//! | shape                              | example                | dialect          |
//! |------------------------------------|------------------------|------------------|
//! | `Month Day Year`                   | `Jan 23 2019`          | POSIX            |
//! | `Month Day HH:MM[:SS]`             | `Feb 10 23:00`         | POSIX            |
//! | `YYYY-MM-DD HH:MM[:SS]`            | `2009-12-02 14:30`     | POSIX (long-iso) |
//! | `MM-DD-YY[YY] HH:MM[AM\|PM]`       | `08-07-15 07:50PM`     | DOS              |
//! | `YYYYMMDDhhmmss[.sss]`             | `20150813224845`       | MLSD             |

use std::str::FromStr;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, TimeZone};

use super::{ParseError, ParseResult};
use crate::regex::{
    DOS_DATE_RE, DOS_TIME_RE, ISO_DATE_RE, LS_CLOCK_RE, LS_DAY_RE, LS_YEAR_RE, MLSX_TIME_RE,
};

/// Month abbreviations, as printed by `ls`. Matched case-sensitively.
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Dates without a year are assumed to be in the past: anything this far ahead of `now` belongs to last year
const YEAR_INFERENCE_HORIZON: Months = Months::new(6);

/// DOS listings may report the year with two digits only; they're always taken as `2000 + YY`
const DOS_CENTURY: i32 = 2000;

/// Returns whether `token` is a month abbreviation
pub(crate) fn is_month(token: &str) -> bool {
    MONTHS.contains(&token)
}

/// Resolve the date `tokens` of a listing line into a timestamp in the time zone of `now`.
///
/// `now` is the reference instant used to infer the year of `ls` dates which omit it.
/// Any token count or syntax outside the supported shapes fails with [`ParseError::UnsupportedDate`].
pub fn resolve_time<Tz: TimeZone>(tokens: &[&str], now: &DateTime<Tz>) -> ParseResult<DateTime<Tz>> {
    match tokens {
        [month, day, year_or_clock] => resolve_ls_time(month, day, year_or_clock, now),
        [date, clock] if DOS_DATE_RE.is_match(date) => {
            resolve_dos_time(date, clock, &now.timezone())
        }
        [date, clock] => resolve_iso_time(date, clock, &now.timezone()),
        [timeval] => resolve_mlsx_time(timeval, &now.timezone()),
        _ => Err(ParseError::UnsupportedDate),
    }
}

/// Resolve a `ls -l` date, which has two possible syntaxes:
///
/// 1. `Nov 5 13:46`: the year is omitted and must be inferred from `now`
/// 2. `Nov 5 2019`: the file is old (or in the future), midnight is assumed
pub fn resolve_ls_time<Tz: TimeZone>(
    month: &str,
    day: &str,
    year_or_clock: &str,
    now: &DateTime<Tz>,
) -> ParseResult<DateTime<Tz>> {
    let month = MONTHS
        .iter()
        .position(|m| *m == month)
        .map(|index| index as u32 + 1)
        .ok_or(ParseError::UnsupportedDate)?;
    if !LS_DAY_RE.is_match(day) {
        return Err(ParseError::UnsupportedDate);
    }
    let day: u32 = parse_field(day)?;
    let tz = now.timezone();

    if LS_YEAR_RE.is_match(year_or_clock) {
        let datetime = NaiveDate::from_ymd_opt(parse_field(year_or_clock)?, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or(ParseError::UnsupportedDate)?;
        return localize(&tz, datetime);
    }

    let clock = LS_CLOCK_RE
        .captures(year_or_clock)
        .ok_or(ParseError::UnsupportedDate)?;
    let hour: u32 = parse_field(&clock[1])?;
    let minute: u32 = parse_field(&clock[2])?;
    let second: u32 = match clock.get(3) {
        Some(second) => parse_field(second.as_str())?,
        None => 0,
    };
    let at_year = |year: i32| -> ParseResult<DateTime<Tz>> {
        let datetime = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .ok_or(ParseError::UnsupportedDate)?;
        localize(&tz, datetime)
    };

    let this_year = now.year();
    // Feb 29 doesn't exist this year: it can only refer to the past
    if NaiveDate::from_ymd_opt(this_year, month, day).is_none() {
        return at_year(this_year - 1);
    }
    let candidate = at_year(this_year)?;
    let horizon = now
        .clone()
        .checked_add_months(YEAR_INFERENCE_HORIZON)
        .ok_or(ParseError::UnsupportedDate)?;
    if candidate >= horizon {
        trace!("{candidate:?} is too far ahead of {now:?}; assuming previous year");
        at_year(this_year - 1)
    } else {
        Ok(candidate)
    }
}

/// Resolve a DOS `dir` date and time (`08-07-15` `07:50PM`).
///
/// Two digits years are promoted with a fixed century rule: `YY` is `2000 + YY`.
pub fn resolve_dos_time<Tz: TimeZone>(date: &str, clock: &str, tz: &Tz) -> ParseResult<DateTime<Tz>> {
    let date = DOS_DATE_RE
        .captures(date)
        .ok_or(ParseError::UnsupportedDate)?;
    let month: u32 = parse_field(&date[1])?;
    let day: u32 = parse_field(&date[2])?;
    let year: i32 = match &date[3] {
        yy if yy.len() == 2 => DOS_CENTURY + parse_field::<i32>(yy)?,
        yyyy => parse_field(yyyy)?,
    };

    let clock = DOS_TIME_RE
        .captures(clock)
        .ok_or(ParseError::UnsupportedDate)?;
    let hour: u32 = parse_field(&clock[1])?;
    let minute: u32 = parse_field(&clock[2])?;
    let hour = match clock.get(3).map(|m| m.as_str().to_ascii_uppercase()) {
        None => hour,
        Some(_) if hour == 0 || hour > 12 => return Err(ParseError::UnsupportedDate),
        Some(meridiem) if meridiem == "AM" => hour % 12,
        Some(_) => hour % 12 + 12,
    };

    let datetime = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or(ParseError::UnsupportedDate)?;
    localize(tz, datetime)
}

/// Resolve a `long-iso` date and time (`2009-12-02` `14:30`)
pub fn resolve_iso_time<Tz: TimeZone>(date: &str, clock: &str, tz: &Tz) -> ParseResult<DateTime<Tz>> {
    let date = ISO_DATE_RE
        .captures(date)
        .ok_or(ParseError::UnsupportedDate)?;
    let clock = LS_CLOCK_RE
        .captures(clock)
        .ok_or(ParseError::UnsupportedDate)?;
    let second: u32 = match clock.get(3) {
        Some(second) => parse_field(second.as_str())?,
        None => 0,
    };
    let datetime = NaiveDate::from_ymd_opt(
        parse_field(&date[1])?,
        parse_field(&date[2])?,
        parse_field(&date[3])?,
    )
    .and_then(|d| d.and_hms_opt(parse_field(&clock[1]).ok()?, parse_field(&clock[2]).ok()?, second))
    .ok_or(ParseError::UnsupportedDate)?;
    localize(tz, datetime)
}

/// Resolve a RFC 3659 `time-val` (`YYYYMMDDhhmmss[.sss]`); fractions of second are truncated
pub fn resolve_mlsx_time<Tz: TimeZone>(timeval: &str, tz: &Tz) -> ParseResult<DateTime<Tz>> {
    let caps = MLSX_TIME_RE
        .captures(timeval)
        .ok_or(ParseError::UnsupportedDate)?;
    let datetime = NaiveDate::from_ymd_opt(
        parse_field(&caps[1])?,
        parse_field(&caps[2])?,
        parse_field(&caps[3])?,
    )
    .and_then(|d| {
        d.and_hms_opt(
            parse_field(&caps[4]).ok()?,
            parse_field(&caps[5]).ok()?,
            parse_field(&caps[6]).ok()?,
        )
    })
    .ok_or(ParseError::UnsupportedDate)?;
    localize(tz, datetime)
}

/// Place a wall clock time in `tz`. On DST overlaps the earliest instant wins;
/// wall clock times skipped by DST don't exist and can't be resolved.
fn localize<Tz: TimeZone>(tz: &Tz, datetime: NaiveDateTime) -> ParseResult<DateTime<Tz>> {
    tz.from_local_datetime(&datetime)
        .earliest()
        .ok_or(ParseError::UnsupportedDate)
}

fn parse_field<T: FromStr>(field: &str) -> ParseResult<T> {
    field.parse::<T>().map_err(|_| ParseError::UnsupportedDate)
}
