//! # Listing Regex
//!
//! Regular expressions matching the tokens found in FTP directory listings

use lazy_regex::{Lazy, Regex};

/// Matches the `total <blocks>` header `ls -l` prints before the entries.
pub static TOTAL_RE: Lazy<Regex> = lazy_regex!(r"^total\s+\d+\s*$");

/// Matches a POSIX mode token, e.g. `drwxr-xr-x` or `-rw-r--r--+`.
/// The type character is captured without validation, so an unknown type can be reported as such.
/// The optional trailing marker is `+` (ACL), `.` (SELinux context) or `@` (extended attributes).
pub static LS_MODE_RE: Lazy<Regex> = lazy_regex!(r"^(\S)([\-rwxsStT]{9})([+.@])?$");

/// Matches a numeric column (link count, size)
pub static LS_NUMBER_RE: Lazy<Regex> = lazy_regex!(r"^\d+$");

/// Matches the day of month in a `ls -l` date
pub static LS_DAY_RE: Lazy<Regex> = lazy_regex!(r"^\d{1,2}$");

/// Matches the year in a `ls -l` date, which replaces the clock time for old files
pub static LS_YEAR_RE: Lazy<Regex> = lazy_regex!(r"^\d{4}$");

/// Matches the clock time in a `ls -l` date (`HH:MM` or `HH:MM:SS`)
pub static LS_CLOCK_RE: Lazy<Regex> = lazy_regex!(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$");

/// Matches a `long-iso` date (`YYYY-MM-DD`) emitted by some `ls -l` implementations
pub static ISO_DATE_RE: Lazy<Regex> = lazy_regex!(r"^(\d{4})-(\d{2})-(\d{2})$");

/// Matches the date of a DOS `dir` line (`MM-DD-YY` or `MM-DD-YYYY`)
pub static DOS_DATE_RE: Lazy<Regex> = lazy_regex!(r"^(\d{2})-(\d{2})-(\d{2}|\d{4})$");

/// Matches the time of a DOS `dir` line (`HH:MMAM`, `HH:MMPM` or 24 hours `HH:MM`)
pub static DOS_TIME_RE: Lazy<Regex> = lazy_regex!(r"^(\d{1,2}):(\d{2})([AaPp][Mm])?$");

/// Matches the RFC 3659 `time-val` (`YYYYMMDDhhmmss[.sss]`)
pub static MLSX_TIME_RE: Lazy<Regex> =
    lazy_regex!(r"^(\d{4})(\d{2})(\d{2})(\d{2})(\d{2})(\d{2})(?:\.\d+)?$");

/// Matches a list of RFC 3659 facts (`key=value;` repeated, without spaces)
pub static MLSX_FACTS_RE: Lazy<Regex> = lazy_regex!(r"^(?:[^=;\s]+=[^;\s]*;)+$");
