//! # List
//!
//! This module exposes the parser for the `LIST` and `MLSD` commands output.
//! Please note that there's no guarantee this parser works and the reason is quite simple.
//! There's no specification regarding the LIST command output, so it basically depends on the implementation of the
//! remote FTP server. Despite this though, this parser handles the POSIX, DOS and RFC 3659 dialects,
//! with the variants encountered in the wild (missing columns, ACL markers, names with spaces...).
//!
//! ## Get started
//!
//! Whenever you receive the output for your LIST command, all you have to do is to iterate over lines and
//! call [`ListParser::parse_line`] as shown in the example.
//!
//! ```rust
//! use chrono::{FixedOffset, Utc};
//! use ftplist::list::{Entry, ListParser};
//!
//! let listing = "total 2\r\n\
//! drwxr-xr-x    3 110      1002            3 Dec 02  2009 pub\r\n\
//! 08-07-15  07:50PM                  718 report.dat\r\n";
//!
//! let parser = ListParser::new(Utc::now(), FixedOffset::east_opt(3600).unwrap());
//! let entries: Vec<Entry<FixedOffset>> = listing
//!     .lines()
//!     .filter(|line| !ftplist::list::is_listing_header(line))
//!     .map(|line| parser.parse_line(line))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(entries[0].name(), "pub");
//! assert!(entries[0].is_directory());
//! assert_eq!(entries[1].size(), 718);
//! ```

mod dos;
mod entry;
mod file_type;
mod mlsd;
mod pex;
mod posix;
pub mod time;

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

pub use self::entry::Entry;
pub use self::file_type::FileType;
pub use self::pex::{Mode, ModeType, PosixPex, PosixPexQuery};
use crate::regex::{DOS_DATE_RE, LS_MODE_RE, MLSX_FACTS_RE, TOTAL_RE};

/// Result type for parsing listing lines
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur when parsing a listing line
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ParseError {
    /// The line doesn't match any known dialect, or one of its fields is malformed
    #[error("Unsupported LIST line")]
    UnsupportedLine,
    /// The dialect was recognized, but the date couldn't be resolved
    #[error("Unsupported LIST date")]
    UnsupportedDate,
    /// The dialect was recognized, but the entry type is unknown
    #[error("Unknown LIST entry type")]
    UnknownEntryType,
}

/// The listing dialects supported by the parser
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Dialect {
    /// `ls -l` style
    Posix,
    /// `dir` style
    Dos,
    /// RFC 3659 facts
    Mlsd,
}

impl Dialect {
    /// Tell which dialect `line` is written in, by looking at its leading tokens.
    ///
    /// Empty lines, `total N` headers and unknown shapes are rejected with [`ParseError::UnsupportedLine`].
    pub fn classify(line: &str) -> ParseResult<Self> {
        if line.trim().is_empty() || TOTAL_RE.is_match(line) {
            return Err(ParseError::UnsupportedLine);
        }
        let first = line
            .split_ascii_whitespace()
            .next()
            .ok_or(ParseError::UnsupportedLine)?;
        if LS_MODE_RE.is_match(first) {
            return Ok(Self::Posix);
        }
        if DOS_DATE_RE.is_match(first) {
            return Ok(Self::Dos);
        }
        match line.split_once(' ') {
            Some((facts, _)) if MLSX_FACTS_RE.is_match(facts) && has_type_fact(facts) => {
                Ok(Self::Mlsd)
            }
            _ => Err(ParseError::UnsupportedLine),
        }
    }

    /// Parse `line` as written in this dialect
    fn parse<Tz: TimeZone>(&self, line: &str, now: &DateTime<Tz>) -> ParseResult<Entry<Tz>> {
        match self {
            Self::Posix => posix::parse(line, now),
            Self::Dos => dos::parse(line, now),
            Self::Mlsd => mlsd::parse(line, now),
        }
    }
}

/// Parser for a line of the `LIST` or `MLSD` command output
///
/// The parser holds the context required to resolve dates:
///
/// - the reference instant, used to infer the year of dates which omit it (`Nov 5 13:46`)
/// - the time zone `Tz` all the timestamps are expressed in
///
/// Use [`ListParser::parse_line`] when you don't know the dialect, or
/// [`ListParser::parse_posix`], [`ListParser::parse_dos`] and [`ListParser::parse_mlsd`] if you do.
#[derive(Debug, Clone)]
pub struct ListParser<Tz: TimeZone = Utc> {
    now: DateTime<Tz>,
}

impl<Tz: TimeZone> ListParser<Tz> {
    /// Instantiates a new [`ListParser`] with `now` as reference instant and producing timestamps in `tz`
    pub fn new<N: TimeZone>(now: DateTime<N>, tz: Tz) -> Self {
        Self {
            now: now.with_timezone(&tz),
        }
    }

    /// Returns the reference instant, expressed in the parser time zone
    pub fn now(&self) -> &DateTime<Tz> {
        &self.now
    }

    /// Parse a listing line, whatever the dialect it is written in.
    /// Returns an [`Entry`] if parsing is successful, otherwise returns a [`ParseError`].
    ///
    /// Trailing `\r` and `\n` are ignored.
    pub fn parse_line(&self, line: &str) -> ParseResult<Entry<Tz>> {
        let line = trim_line(line);
        let dialect = Dialect::classify(line).inspect_err(|err| {
            debug!("Could not classify line {line:?}: {err}");
        })?;
        trace!("Parsing {dialect:?} line {line}");
        dialect.parse(line, &self.now).inspect_err(|err| {
            debug!("Could not parse {dialect:?} line {line:?}: {err}");
        })
    }

    /// Parse a POSIX `ls -l` line
    ///
    /// ```text
    /// {FILE_TYPE}{PERMISSIONS} {LINK_COUNT} {USER} {GROUP} {FILE_SIZE} {MODIFIED_TIME} {FILENAME}
    /// -rw-r--r-- 1 user group 1234 Nov 5 13:46 example.txt
    /// ```
    pub fn parse_posix(&self, line: &str) -> ParseResult<Entry<Tz>> {
        posix::parse(trim_line(line), &self.now)
    }

    /// Try to parse a DOS `dir` line
    ///
    /// ```text
    /// {DATE} {TIME} {<DIR> | SIZE} {FILENAME}
    /// 10-19-20  03:19PM <DIR> pub
    /// 04-08-14  03:09PM 403   readme.txt
    /// ```
    pub fn parse_dos(&self, line: &str) -> ParseResult<Entry<Tz>> {
        dos::parse(trim_line(line), &self.now)
    }

    /// Parse an output line from a MLSD or MLST command
    ///
    /// ```text
    /// type=dir;modify=20201019151930;UNIX.mode=0755;UNIX.uid=1000;UNIX.gid=1000; pub
    /// ```
    pub fn parse_mlsd(&self, line: &str) -> ParseResult<Entry<Tz>> {
        mlsd::parse(trim_line(line), &self.now)
    }
}

/// Parse a single listing line, using `now` as reference instant and expressing timestamps in `tz`.
///
/// Shorthand for [`ListParser::parse_line`].
pub fn parse_line<N: TimeZone, Tz: TimeZone>(
    line: &str,
    now: &DateTime<N>,
    tz: &Tz,
) -> ParseResult<Entry<Tz>> {
    ListParser {
        now: now.with_timezone(tz),
    }
    .parse_line(line)
}

/// Returns whether `line` is the `total N` header `ls -l` prints before the entries
pub fn is_listing_header(line: &str) -> bool {
    TOTAL_RE.is_match(trim_line(line))
}

fn trim_line(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n']).trim_start()
}

fn has_type_fact(facts: &str) -> bool {
    facts.split(';').any(|fact| {
        fact.split_once('=')
            .is_some_and(|(key, _)| key.eq_ignore_ascii_case("type"))
    })
}

/// A whitespace delimited token of a line, with the byte offset where it ends
#[derive(Debug, Clone, Copy)]
pub(crate) struct Token<'a> {
    pub text: &'a str,
    pub end: usize,
}

/// Split `line` on runs of ASCII whitespace, keeping track of the offsets,
/// so that the caller can slice the verbatim remainder of the line
pub(crate) fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in line.char_indices() {
        match (c.is_ascii_whitespace(), start) {
            (true, Some(from)) => {
                tokens.push(Token {
                    text: &line[from..i],
                    end: i,
                });
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(from) = start {
        tokens.push(Token {
            text: &line[from..],
            end: line.len(),
        });
    }
    tokens
}

#[cfg(test)]
mod test {

    use std::path::Path;

    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 3, 10, 23, 0, 0).unwrap()
    }

    fn this_year() -> i32 {
        2017
    }

    fn previous_year() -> i32 {
        this_year() - 1
    }

    fn time(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .unwrap()
    }

    fn parser() -> ListParser<Utc> {
        ListParser::new(now(), Utc)
    }

    #[test]
    fn should_parse_valid_lines() {
        crate::log_init();
        let valid: Vec<(&str, &str, u32, u64, DateTime<Utc>)> = vec![
            // UNIX ls -l style
            (
                "drwxr-xr-x    3 110      1002            3 Dec 02  2009 pub",
                "pub",
                0o040755,
                0,
                time(2009, 12, 2, 0, 0, 0),
            ),
            (
                "drwxr-xr-x    3 110      1002            3 Dec 02  2009 p u b",
                "p u b",
                0o040755,
                0,
                time(2009, 12, 2, 0, 0, 0),
            ),
            (
                "-rw-r--r--   1 marketwired marketwired    12016 Mar 16  2016 2016031611G087802-001.newsml",
                "2016031611G087802-001.newsml",
                0o100644,
                12016,
                time(2016, 3, 16, 0, 0, 0),
            ),
            (
                "-rwxr-xr-x    3 110      1002            1234567 Dec 02  2009 fileName",
                "fileName",
                0o100755,
                1234567,
                time(2009, 12, 2, 0, 0, 0),
            ),
            (
                "lrwxrwxrwx   1 root     other          7 Jan 25 00:17 bin -> usr/bin",
                "bin",
                0o120777,
                0,
                time(this_year(), 1, 25, 0, 17, 0),
            ),
            // Another ls style
            (
                "drwxr-xr-x               folder        0 Aug 15 05:49 !!!-Tipp des Haus!",
                "!!!-Tipp des Haus!",
                0o040755,
                0,
                time(this_year(), 8, 15, 5, 49, 0),
            ),
            (
                "drwxrwxrwx               folder        0 Aug 11 20:32 P0RN",
                "P0RN",
                0o040777,
                0,
                time(this_year(), 8, 11, 20, 32, 0),
            ),
            (
                "-rw-r--r--        0   18446744073709551615 18446744073709551615 Nov 16  2006 VIDEO_TS.VOB",
                "VIDEO_TS.VOB",
                0o100644,
                u64::MAX,
                time(2006, 11, 16, 0, 0, 0),
            ),
            // Microsoft's FTP servers for Windows
            (
                "----------   1 owner    group         1803128 Jul 10 10:18 ls-lR.Z",
                "ls-lR.Z",
                0o100000,
                1803128,
                time(this_year(), 7, 10, 10, 18, 0),
            ),
            (
                "d---------   1 owner    group               0 Nov  9 19:45 Softlib",
                "Softlib",
                0o040000,
                0,
                time(previous_year(), 11, 9, 19, 45, 0),
            ),
            // WFTPD for MSDOS
            (
                "-rwxrwxrwx   1 noone    nogroup      322 Aug 19  1996 message.ftp",
                "message.ftp",
                0o100777,
                322,
                time(1996, 8, 19, 0, 0, 0),
            ),
            // RFC3659 format: https://tools.ietf.org/html/rfc3659#section-7
            (
                "modify=20150813224845;perm=fle;type=cdir;unique=119FBB87U4;UNIX.group=0;UNIX.mode=0755;UNIX.owner=0; .",
                ".",
                0o040000,
                0,
                time(2015, 8, 13, 22, 48, 45),
            ),
            (
                "modify=20150813224845;perm=fle;type=pdir;unique=119FBB87U4;UNIX.group=0;UNIX.mode=0755;UNIX.owner=0; ..",
                "..",
                0o040000,
                0,
                time(2015, 8, 13, 22, 48, 45),
            ),
            (
                "modify=20150806235817;perm=fle;type=dir;unique=1B20F360U4;UNIX.group=0;UNIX.mode=0755;UNIX.owner=0; movies",
                "movies",
                0o040000,
                0,
                time(2015, 8, 6, 23, 58, 17),
            ),
            (
                "modify=20150814172949;perm=flcdmpe;type=dir;unique=85A0C168U4;UNIX.group=0;UNIX.mode=0777;UNIX.owner=0; _upload",
                "_upload",
                0o040000,
                0,
                time(2015, 8, 14, 17, 29, 49),
            ),
            (
                "modify=20150813175250;perm=adfr;size=951;type=file;unique=119FBB87UE;UNIX.group=0;UNIX.mode=0644;UNIX.owner=0; welcome.msg",
                "welcome.msg",
                0o100000,
                951,
                time(2015, 8, 13, 17, 52, 50),
            ),
            // Format and types have first letter UpperCase
            (
                "Modify=20150813175250;Perm=adfr;Size=951;Type=file;Unique=119FBB87UE;UNIX.group=0;UNIX.mode=0644;UNIX.owner=0; welcome.msg",
                "welcome.msg",
                0o100000,
                951,
                time(2015, 8, 13, 17, 52, 50),
            ),
            // DOS DIR command output
            (
                "08-07-15  07:50PM                  718 Post_PRR_20150901_1166_265118_13049.dat",
                "Post_PRR_20150901_1166_265118_13049.dat",
                0o100000,
                718,
                time(2015, 8, 7, 19, 50, 0),
            ),
            (
                "08-10-15  02:04PM       <DIR>          Billing",
                "Billing",
                0o040000,
                0,
                time(2015, 8, 10, 14, 4, 0),
            ),
            (
                "08-07-2015  07:50PM                  718 Post_PRR_20150901_1166_265118_13049.dat",
                "Post_PRR_20150901_1166_265118_13049.dat",
                0o100000,
                718,
                time(2015, 8, 7, 19, 50, 0),
            ),
            (
                "08-10-2015  02:04PM       <DIR>          Billing",
                "Billing",
                0o040000,
                0,
                time(2015, 8, 10, 14, 4, 0),
            ),
            // dir and file names that contain multiple spaces
            (
                "drwxr-xr-x    3 110      1002            3 Dec 02  2009 spaces   dir   name",
                "spaces   dir   name",
                0o040755,
                0,
                time(2009, 12, 2, 0, 0, 0),
            ),
            (
                "-rwxr-xr-x    3 110      1002            1234567 Dec 02  2009 file   name",
                "file   name",
                0o100755,
                1234567,
                time(2009, 12, 2, 0, 0, 0),
            ),
            (
                "-rwxr-xr-x    3 110      1002            1234567 Dec 02  2009  foo bar ",
                " foo bar ",
                0o100755,
                1234567,
                time(2009, 12, 2, 0, 0, 0),
            ),
            // Odd link count from hostedftp.com
            (
                "-r--------   0 user group     65222236 Feb 24 00:39 RegularFile",
                "RegularFile",
                0o100400,
                65222236,
                time(this_year(), 2, 24, 0, 39, 0),
            ),
            // Line with ACL persmissions
            (
                "-rwxrw-r--+  1 521      101         2080 May 21 10:53 data.csv",
                "data.csv",
                0o100764,
                2080,
                time(this_year(), 5, 21, 10, 53, 0),
            ),
        ];

        for (line, name, mode, size, modified) in valid {
            let entry = parser()
                .parse_line(line)
                .unwrap_or_else(|err| panic!("{line}: {err}"));
            assert_eq!(entry.name(), name, "{line}");
            assert_eq!(entry.mode().bits(), mode, "{line}");
            assert_eq!(entry.size(), size, "{line}");
            assert_eq!(entry.modified(), &modified, "{line}");
        }
    }

    #[test]
    fn should_parse_symlinks() {
        for (line, name, target) in [
            (
                "lrwxrwxrwx   1 root     other          7 Jan 25 00:17 bin -> usr/bin",
                "bin",
                "usr/bin",
            ),
            (
                "lrwxrwxrwx    1 0        1001           27 Jul 07  2017 R-3.4.0.pkg -> el-capitan/base/R-3.4.0.pkg",
                "R-3.4.0.pkg",
                "el-capitan/base/R-3.4.0.pkg",
            ),
        ] {
            let entry = parser().parse_line(line).unwrap();
            assert_eq!(entry.name(), name);
            assert!(entry.is_symlink());
            assert_eq!(entry.symlink(), Some(Path::new(target)));
            assert_eq!(entry.mode().mode_type(), ModeType::Symlink);
            assert_eq!(entry.size(), 0);
        }
    }

    #[test]
    fn should_reject_unsupported_lines() {
        for (line, err) in [
            (
                "d [R----F--] supervisor            512       Jan 16 18:53 login",
                ParseError::UnsupportedLine,
            ),
            (
                "- [R----F--] rhesus             214059       Oct 20 15:27 cx.exe",
                ParseError::UnsupportedLine,
            ),
            (
                "drwxr-xr-x    3 110      1002            3 Dec 02  209 pub",
                ParseError::UnsupportedDate,
            ),
            (
                "modify=20150806235817;invalid;UNIX.owner=0; movies",
                ParseError::UnsupportedLine,
            ),
            (
                "modify=20150806235817;size=1; movies",
                ParseError::UnsupportedLine,
            ),
            (
                "Zrwxrwxrwx   1 root     other          7 Jan 25 00:17 bin -> usr/bin",
                ParseError::UnknownEntryType,
            ),
            (
                "type=OS.unix=slink:/foo;modify=20150806235817; movies",
                ParseError::UnknownEntryType,
            ),
            ("total 1", ParseError::UnsupportedLine),
            ("000000000x ", ParseError::UnsupportedLine),
            ("", ParseError::UnsupportedLine),
            ("   ", ParseError::UnsupportedLine),
            ("\r\n", ParseError::UnsupportedLine),
        ] {
            assert_eq!(parser().parse_line(line).unwrap_err(), err, "{line:?}");
        }
    }

    #[test]
    fn should_classify_dialects() {
        assert_eq!(
            Dialect::classify("-rw-r--r-- 1 u g 1 Jan 1 2000 a").unwrap(),
            Dialect::Posix
        );
        assert_eq!(
            Dialect::classify("Zrwxrwxrwx 1 u g 1 Jan 1 2000 a").unwrap(),
            Dialect::Posix
        );
        assert_eq!(
            Dialect::classify("08-10-15  02:04PM       <DIR>          Billing").unwrap(),
            Dialect::Dos
        );
        assert_eq!(
            Dialect::classify("Type=file;size=1; a").unwrap(),
            Dialect::Mlsd
        );
        assert_eq!(
            Dialect::classify("size=1;modify=20150806235817; a").unwrap_err(),
            ParseError::UnsupportedLine
        );
        assert_eq!(
            Dialect::classify("hello world").unwrap_err(),
            ParseError::UnsupportedLine
        );
    }

    #[test]
    fn should_strip_line_terminators() {
        let entry = parser()
            .parse_line("08-10-15  02:04PM       <DIR>          Billing\r\n")
            .unwrap();
        assert_eq!(entry.name(), "Billing");
        let entry = parser()
            .parse_posix("-rw-r--r-- 1 u g 1 Jan 1 2000 a b \r")
            .unwrap();
        assert_eq!(entry.name(), "a b ");
    }

    #[test]
    fn should_use_dialect_specific_parsers() {
        let parser = parser();
        assert!(parser.parse_posix("-rw-r--r-- 1 u g 1 Jan 1 2000 a").is_ok());
        assert!(parser.parse_dos("04-08-14  03:09PM  8192 omar.txt").is_ok());
        assert!(parser.parse_mlsd("type=file;size=1; a").is_ok());
        assert_eq!(
            parser.parse_posix("04-08-14  03:09PM  8192 omar.txt").unwrap_err(),
            ParseError::UnsupportedLine
        );
        assert_eq!(
            parser.parse_dos("type=file;size=1; a").unwrap_err(),
            ParseError::UnsupportedLine
        );
        assert_eq!(
            parser.parse_mlsd("-rw-r--r-- 1 u g 1 Jan 1 2000 a").unwrap_err(),
            ParseError::UnsupportedLine
        );
    }

    #[test]
    fn should_express_times_in_caller_zone() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let entry = parse_line(
            "-rw-r--r-- 1 u g 1 Jan 23 2019 a",
            &now(),
            &tz,
        )
        .unwrap();
        assert_eq!(entry.modified().offset(), &tz);
        assert_eq!(
            entry.modified().with_timezone(&Utc),
            time(2019, 1, 23, 5, 0, 0)
        );
        let parser = ListParser::new(now(), tz);
        assert_eq!(parser.now().offset(), &tz);
        assert_eq!(parser.now().with_timezone(&Utc), now());
    }

    #[test]
    fn should_be_deterministic() {
        let line = "-rw-r--r-- 1 u g 1 Sep 10 23:00 a";
        let first = parse_line(line, &now(), &Utc).unwrap();
        let second = parse_line(line, &now(), &Utc).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.modified(), &time(previous_year(), 9, 10, 23, 0, 0));
    }

    #[test]
    fn should_parse_from_many_threads() {
        let parser = parser();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let parser = &parser;
                    scope.spawn(move || {
                        parser
                            .parse_line(&format!("-rw-r--r-- 1 u g {i} Jan 1 2000 file{i}"))
                            .unwrap()
                    })
                })
                .collect();
            for (i, handle) in handles.into_iter().enumerate() {
                let entry = handle.join().unwrap();
                assert_eq!(entry.size(), i as u64);
                assert_eq!(entry.name(), format!("file{i}"));
            }
        });
    }

    #[test]
    fn should_detect_listing_header() {
        assert!(is_listing_header("total 1"));
        assert!(is_listing_header("total 5120\r"));
        assert!(!is_listing_header("-rw-r--r-- 1 u g 1 Jan 1 2000 total 1"));
    }

    #[test]
    fn should_tokenize_with_offsets() {
        let line = "a  bb\tc ";
        let tokens = tokenize(line);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["a", "bb", "c"]);
        assert_eq!(tokens[1].end, 5);
        assert_eq!(&line[tokens[2].end..], " ");
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn should_display_errors() {
        assert_eq!(
            ParseError::UnsupportedLine.to_string(),
            "Unsupported LIST line"
        );
        assert_eq!(
            ParseError::UnsupportedDate.to_string(),
            "Unsupported LIST date"
        );
        assert_eq!(
            ParseError::UnknownEntryType.to_string(),
            "Unknown LIST entry type"
        );
    }
}
