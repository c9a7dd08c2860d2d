//! Error types for dyndns53.

use crate::PROG_NAME;
use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dyndns53.
pub type Result<T> = std::result::Result<T, DynDnsError>;

/// dyndns53 error types.
#[derive(Error, Debug)]
pub enum DynDnsError {
    /// No record set name was given.
    #[error("missing record set name")]
    NoRecordNames,

    /// A record set name is empty.
    #[error("missing record set name at index {0}")]
    EmptyRecordName(usize),

    /// Record type flag is empty.
    #[error("missing record set type")]
    MissingRecordType,

    /// Record type is neither A nor AAAA.
    #[error("invalid record set type: {0}")]
    InvalidRecordType(String),

    /// TTL below one second.
    #[error("invalid record set TTL: {0}")]
    InvalidTtl(i64),

    /// Hosted zone id is empty.
    #[error("missing hosted zone id")]
    MissingHostedZone,

    /// Log file could not be opened.
    #[error("log file: {0}")]
    LogFile(std::io::Error),

    /// Logging was already initialized.
    #[error("logging: {0}")]
    Logging(String),

    /// Public IP lookup failed.
    #[error("current IP address: {0}")]
    IpDetection(String),

    /// Provider credentials could not be located.
    #[error("credentials: {0}")]
    Credentials(String),

    /// Provider rejected or never received the change batch.
    #[error("upsert: {0}")]
    Provider(String),

    /// Cache file could not be written.
    #[error("update last IP address ({}): {error}", path.display())]
    StateWrite { path: PathBuf, error: std::io::Error },
}

impl DynDnsError {
    /// Whether the error stems from user input rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DynDnsError::NoRecordNames
                | DynDnsError::EmptyRecordName(_)
                | DynDnsError::MissingRecordType
                | DynDnsError::InvalidRecordType(_)
                | DynDnsError::InvalidTtl(_)
                | DynDnsError::MissingHostedZone
        )
    }
}

impl From<reqwest::Error> for DynDnsError {
    fn from(e: reqwest::Error) -> Self {
        DynDnsError::IpDetection(error_chain(&e))
    }
}

/// Join an error and its causes with ": ".
///
/// A cause whose text is already part of the message is skipped, so
/// wrappers that repeat their inner error are printed once.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        let text = e.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = e.source();
    }
    message
}

/// The single line printed when a run aborts.
pub fn fatal_line(err: &(dyn StdError + 'static)) -> String {
    format!("{}: {}", PROG_NAME, error_chain(err))
}
