use std::path::PathBuf;

use argh::FromArgs;
use chrono::{DateTime, FixedOffset};

#[derive(FromArgs)]
#[argh(
    description = "Parse the output of the FTP LIST and MLSD commands, one line at a time.
Please, report issues to <https://github.com/veeso/ftplist>"
)]
pub struct Args {
    #[argh(switch, short = 'D', description = "enable TRACE log level")]
    pub debug: bool,
    #[argh(switch, short = 'v', description = "verbose mode")]
    pub verbose: bool,
    #[argh(switch, short = 'V', description = "print version")]
    pub version: bool,
    #[argh(
        option,
        short = 'n',
        from_str_fn(parse_now),
        description = "reference instant used to infer missing years (RFC 3339); defaults to now"
    )]
    pub now: Option<DateTime<FixedOffset>>,
    #[argh(
        option,
        short = 'z',
        description = "utc offset timestamps are expressed in (e.g. +02:00); defaults to +00:00"
    )]
    pub utc_offset: Option<FixedOffset>,
    #[argh(
        switch,
        short = 's',
        description = "abort on the first line which can't be parsed"
    )]
    pub strict: bool,
    #[argh(positional, description = "file to read the listing from; stdin if omitted")]
    pub file: Option<PathBuf>,
}

fn parse_now(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value).map_err(|err| format!("invalid instant '{value}': {err}"))
}
