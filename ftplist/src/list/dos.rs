//! DOS `dir` style lines, as returned by IIS
//!
//! ```text
//! {DATE} {TIME} {<DIR> | SIZE} {FILENAME}
//! 10-19-20  03:19PM <DIR> pub
//! 04-08-14  03:09PM 403   readme.txt
//! ```

use chrono::{DateTime, TimeZone};

use super::time::resolve_dos_time;
use super::{tokenize, Entry, FileType, Mode, ParseError, ParseResult};
use crate::regex::DOS_DATE_RE;

/// Marker replacing the size of directories
const DIR_MARKER: &str = "<DIR>";

/// Parse a DOS `dir` line
pub(crate) fn parse<Tz: TimeZone>(line: &str, now: &DateTime<Tz>) -> ParseResult<Entry<Tz>> {
    let tokens = tokenize(line);
    let (date, rest) = tokens.split_first().ok_or(ParseError::UnsupportedLine)?;
    if !DOS_DATE_RE.is_match(date.text) {
        return Err(ParseError::UnsupportedLine);
    }
    // some servers detach the meridiem from the time (`03:09 PM`)
    let (clock, size_at) = match rest {
        [clock, meridiem, ..]
            if meridiem.text.eq_ignore_ascii_case("AM")
                || meridiem.text.eq_ignore_ascii_case("PM") =>
        {
            (format!("{}{}", clock.text, meridiem.text), 3)
        }
        [clock, ..] => (clock.text.to_string(), 2),
        [] => return Err(ParseError::UnsupportedLine),
    };
    let size_token = tokens.get(size_at).ok_or(ParseError::UnsupportedLine)?;
    let name = line[size_token.end..].trim_start();
    if name.is_empty() {
        return Err(ParseError::UnsupportedLine);
    }

    let modified = resolve_dos_time(date.text, &clock, &now.timezone())?;
    let (file_type, size) = match size_token.text {
        DIR_MARKER => (FileType::Directory, 0),
        size => (
            FileType::File,
            size.replace(',', "")
                .parse::<u64>()
                .map_err(|_| ParseError::UnsupportedLine)?,
        ),
    };

    trace!(
        "Found file with name {}, type: {:?}, size: {}",
        name,
        file_type,
        size,
    );
    Ok(Entry {
        name: name.to_string(),
        mode: Mode::empty(file_type.mode_type()),
        file_type,
        size,
        modified,
        owner: None,
        group: None,
    })
}

#[cfg(test)]
mod test {

    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 3, 10, 23, 0, 0).unwrap()
    }

    #[test]
    fn should_parse_dos_file() {
        crate::log_init();
        let entry = parse("04-08-14  03:09PM  8192 omar.txt", &now()).unwrap();
        assert_eq!(entry.name(), "omar.txt");
        assert_eq!(entry.size(), 8192);
        assert!(entry.is_file());
        assert_eq!(entry.owner(), None);
        assert_eq!(entry.group(), None);
        assert_eq!(entry.mode().to_string(), "----------");
        assert_eq!(
            entry.modified(),
            &Utc.with_ymd_and_hms(2014, 4, 8, 15, 9, 0).unwrap()
        );
    }

    #[test]
    fn should_parse_dos_directory() {
        let entry = parse("04-08-14  03:09PM  <DIR> docs", &now()).unwrap();
        assert_eq!(entry.name(), "docs");
        assert!(entry.is_directory());
        assert_eq!(entry.size(), 0);
        assert_eq!(entry.mode().to_string(), "d---------");
    }

    #[test]
    fn should_parse_detached_meridiem_and_separators() {
        let entry = parse(
            "08-07-2015  07:50 PM          1,024 name with  spaces",
            &now(),
        )
        .unwrap();
        assert_eq!(entry.name(), "name with  spaces");
        assert_eq!(entry.size(), 1024);
        assert_eq!(
            entry.modified(),
            &Utc.with_ymd_and_hms(2015, 8, 7, 19, 50, 0).unwrap()
        );
    }

    #[test]
    fn should_reject_bad_dos_lines() {
        assert_eq!(
            parse("-08-14  03:09PM  <DIR> docs", &now()).unwrap_err(),
            ParseError::UnsupportedLine
        );
        assert_eq!(
            parse("34-08-14  03:09PM  <DIR> docs", &now()).unwrap_err(),
            ParseError::UnsupportedDate
        );
        assert_eq!(
            parse("04-08-14  03:09PM  OMAR docs", &now()).unwrap_err(),
            ParseError::UnsupportedLine
        );
        assert_eq!(
            parse("04-08-14  03:09PM  <DIR>", &now()).unwrap_err(),
            ParseError::UnsupportedLine
        );
        assert_eq!(
            parse("04-08-14", &now()).unwrap_err(),
            ParseError::UnsupportedLine
        );
    }
}
