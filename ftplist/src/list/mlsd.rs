//! RFC 3659 fact lists, as returned by `MLSD` and `MLST`
//!
//! ```text
//! type=dir;modify=20201019151930;UNIX.mode=0755;UNIX.uid=1000;UNIX.gid=1000; pub
//! ```

use chrono::{DateTime, TimeZone, Utc};

use super::time::resolve_mlsx_time;
use super::{Entry, FileType, Mode, ParseError, ParseResult};
use crate::regex::MLSX_FACTS_RE;

/// Parse a `MLSD` line
pub(crate) fn parse<Tz: TimeZone>(line: &str, now: &DateTime<Tz>) -> ParseResult<Entry<Tz>> {
    let (facts, name) = line.split_once(' ').ok_or(ParseError::UnsupportedLine)?;
    if name.is_empty() || !MLSX_FACTS_RE.is_match(facts) {
        return Err(ParseError::UnsupportedLine);
    }
    let tz = now.timezone();

    let mut file_type: Option<FileType> = None;
    let mut size: Option<&str> = None;
    let mut modified: Option<DateTime<Tz>> = None;
    let mut owner: Option<String> = None;
    let mut group: Option<String> = None;
    for fact in facts.split(';').filter(|fact| !fact.is_empty()) {
        let (key, value) = fact.split_once('=').ok_or(ParseError::UnsupportedLine)?;
        match key.to_ascii_lowercase().as_str() {
            "type" => {
                file_type = Some(match value.to_ascii_lowercase().as_str() {
                    "file" => FileType::File,
                    // cdir is the listed directory itself, pdir its parent
                    "dir" | "cdir" | "pdir" => FileType::Directory,
                    _ => return Err(ParseError::UnknownEntryType),
                });
            }
            "size" => size = Some(value),
            "modify" => modified = Some(resolve_mlsx_time(value, &tz)?),
            "unix.owner" | "unix.uid" => owner = Some(value.to_string()),
            "unix.group" | "unix.gid" => group = Some(value.to_string()),
            _ => continue,
        }
    }

    let file_type = file_type.ok_or(ParseError::UnsupportedLine)?;
    let size = match (&file_type, size) {
        (FileType::File, Some(size)) => size
            .parse::<u64>()
            .map_err(|_| ParseError::UnsupportedLine)?,
        _ => 0,
    };
    let modified = modified.unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH.with_timezone(&tz));

    trace!(
        "Found file with name {}, type: {:?}, size: {}, owner: {:?}, group: {:?}",
        name,
        file_type,
        size,
        owner,
        group
    );
    Ok(Entry {
        name: name.to_string(),
        mode: Mode::empty(file_type.mode_type()),
        file_type,
        size,
        modified,
        owner,
        group,
    })
}
