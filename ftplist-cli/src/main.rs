//! # ftplist
//!
//! Command line front-end for ftplist: reads a `LIST` or `MLSD` output from a file or stdin
//! and prints one line per parsed entry.
//!

#[macro_use]
extern crate log;

// -- mods
mod actions;
mod args;

use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use actions::{parse_listing, ListingError};
use args::Args;
use chrono::{Offset, Utc};
use env_logger::Builder as LogBuilder;
use ftplist::ListParser;
use log::LevelFilter;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

fn main() -> ExitCode {
    let args: Args = argh::from_env();
    // print version
    if args.version {
        println!("ftplist {APP_VERSION} - developed by {APP_AUTHORS}");
        return ExitCode::SUCCESS;
    }
    // init logger
    LogBuilder::new()
        .filter_level(if args.debug {
            LevelFilter::Trace
        } else if args.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Off
        })
        .init();

    let tz = args.utc_offset.unwrap_or_else(|| Utc.fix());
    let parser = match args.now {
        Some(now) => ListParser::new(now, tz),
        None => ListParser::new(Utc::now(), tz),
    };
    debug!("reference instant: {}", parser.now());

    let stdout = io::stdout().lock();
    let stderr = io::stderr().lock();
    let result = match args.file.as_deref() {
        Some(path) => match File::open(path) {
            Ok(file) => parse_listing(&parser, BufReader::new(file), stdout, stderr, args.strict),
            Err(err) => {
                eprintln!("Could not open {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => parse_listing(&parser, io::stdin().lock(), stdout, stderr, args.strict),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(ListingError::Io(err)) => {
            eprintln!("I/O error: {err}");
            ExitCode::FAILURE
        }
        Err(ListingError::Rejected {
            line_no,
            line,
            error,
        }) => {
            eprintln!("line {line_no}: {error}: {line}");
            ExitCode::FAILURE
        }
    }
}
