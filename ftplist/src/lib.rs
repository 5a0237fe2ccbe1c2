#![crate_name = "ftplist"]
#![crate_type = "lib"]

//! # ftplist
//!
//! ftplist is a parser for the directory listings returned by FTP servers.
//! It takes a **single line** of the output of the `LIST` or `MLSD` command and turns it into an [`Entry`].
//!
//! There's no standard for the `LIST` output, so each server does more or less what it wants.
//! This crate recognizes the dialects you'll meet in the wild:
//!
//! - POSIX `ls -l` style (including ACL markers, symlinks and servers omitting columns)
//! - DOS `dir` style, as used by IIS
//! - RFC 3659 fact lists, as returned by `MLSD`
//!
//! ## Get started
//!
//! Add **ftplist** to your dependencies:
//!
//! ```toml
//! ftplist = "^0.1"
//! ```
//!
//! ## Usage
//!
//! The parser never reads the system clock: you must provide the reference instant used to infer
//! the year on dates which don't report it, and the time zone the timestamps are expressed in.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use ftplist::ListParser;
//!
//! let now = Utc.with_ymd_and_hms(2017, 3, 10, 23, 0, 0).unwrap();
//! let parser = ListParser::new(now, Utc);
//!
//! let entry = parser
//!     .parse_line("lrwxrwxrwx   1 root     other          7 Jan 25 00:17 bin -> usr/bin")
//!     .unwrap();
//! assert_eq!(entry.name(), "bin");
//! assert!(entry.is_symlink());
//! assert_eq!(entry.size(), 0);
//! ```
//!
//! Splitting the listing into lines is up to you; each line is parsed independently.
//!

#![doc(html_playground_url = "https://play.rust-lang.org")]

// -- common deps
#[macro_use]
extern crate lazy_regex;
#[macro_use]
extern crate log;

// -- public
pub mod list;
pub mod regex;

// -- export (common)
pub use list::{parse_line, Entry, FileType, ListParser, Mode, ParseError, ParseResult};

// -- test logging
#[cfg(test)]
pub fn log_init() {
    let _ = env_logger::builder().is_test(true).try_init();
}
