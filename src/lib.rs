//! # dyndns53
//!
//! A dynamic DNS updater for Amazon Route 53.
//!
//! Each run detects the caller's public address, compares it with the last
//! address that was published, and upserts the configured record sets when
//! it changed. The run is a single pass meant to be scheduled externally
//! (cron, systemd timer).
//!
//! ## Usage
//!
//! ```bash
//! # Point two names at the current IPv4 address
//! dyndns53 -name home.example.com -name vpn.example.com -zone Z123EXAMPLE
//!
//! # IPv6, short TTL, log to a file
//! dyndns53 -name home.example.com -type AAAA -ttl 60 -zone Z123EXAMPLE -log /var/log/dyndns53.log
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod logging;
pub mod providers;
pub mod record;
pub mod state;
pub mod updater;

pub use config::{Cli, Config};
pub use detector::IpDetector;
pub use error::{DynDnsError, Result};
pub use record::{RecordSet, RecordType};
pub use state::{CachedAddress, StateStore};
pub use updater::{Outcome, Updater};

/// Program name; also the credentials profile and the cache file stem.
pub const PROG_NAME: &str = "dyndns53";
