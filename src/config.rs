//! Command-line configuration for dyndns53.

use crate::error::{DynDnsError, Result};
use crate::logging::LogDestination;
use crate::record::RecordSet;
use crate::PROG_NAME;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Long flags that are also accepted with a single leading dash.
const LONG_FLAGS: &[&str] = &["name", "type", "ttl", "zone", "log", "help", "version"];

/// Command-line arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = PROG_NAME)]
#[command(about = "Point Route 53 record sets at the current public IP address")]
#[command(version)]
pub struct Cli {
    /// Record set name; repeat for several names (-name a.example.com -name b.example.com)
    #[arg(long = "name", value_name = "NAME")]
    pub names: Vec<String>,

    /// Record set type; "A" or "AAAA"
    #[arg(long = "type", value_name = "TYPE", default_value = "A")]
    pub record_type: String,

    /// TTL (time to live) in seconds
    #[arg(long, default_value_t = 300, allow_negative_numbers = true)]
    pub ttl: i64,

    /// Hosted zone id
    #[arg(long, value_name = "ID", default_value = "")]
    pub zone: String,

    /// File to append log lines to (default is stdout)
    #[arg(long, value_name = "FILE", default_value = "")]
    pub log: String,
}

impl Cli {
    /// Parse arguments, accepting both `-name` and `--name` spellings.
    pub fn parse_compat<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(normalize_flag_args(args))
    }
}

/// Rewrite single-dash long flags (`-name`, `-ttl=60`) to their double-dash form.
///
/// Only the known flag names are touched, so values such as `-5` pass through.
/// Everything after a bare `--` is left alone.
pub fn normalize_flag_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for (i, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }

        let rewritten = arg.to_str().and_then(|s| {
            let flag = s.strip_prefix('-').filter(|rest| !rest.starts_with('-'))?;
            let key = flag.split_once('=').map_or(flag, |(k, _)| k);
            LONG_FLAGS.contains(&key).then(|| OsString::from(format!("-{}", s)))
        });
        out.push(rewritten.unwrap_or(arg));
    }

    out
}

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Record sets to keep pointed at the current address.
    pub record_set: RecordSet,
    /// Where log lines go.
    pub log: LogDestination,
}

impl TryFrom<Cli> for Config {
    type Error = DynDnsError;

    fn try_from(cli: Cli) -> Result<Self> {
        let record_set = RecordSet::new(&cli.names, &cli.record_type, cli.ttl, &cli.zone)?;

        let log = if cli.log.is_empty() {
            LogDestination::Stdout
        } else {
            LogDestination::File(PathBuf::from(cli.log))
        };

        Ok(Self { record_set, log })
    }
}
