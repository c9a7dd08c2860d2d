//! Record set model and validation.

use crate::error::{DynDnsError, Result};
use std::fmt;
use std::str::FromStr;

/// Trailing separator marking a name as fully qualified.
pub const ROOT_SEPARATOR: char = '.';

/// Record types that can carry an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    A,
    Aaaa,
}

impl RecordType {
    /// Wire name as the provider expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = DynDnsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Err(DynDnsError::MissingRecordType),
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            other => Err(DynDnsError::InvalidRecordType(other.to_string())),
        }
    }
}

/// Append the root separator unless the name already ends with it.
pub fn normalize_name(name: &str) -> String {
    if name.ends_with(ROOT_SEPARATOR) {
        name.to_string()
    } else {
        format!("{}{}", name, ROOT_SEPARATOR)
    }
}

/// Group of records sharing type, TTL and value within one hosted zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    names: Vec<String>,
    value: String,
    record_type: RecordType,
    ttl: i64,
    hosted_zone_id: String,
}

impl RecordSet {
    /// Build a validated record set.
    ///
    /// Fields are checked in order (names, type, TTL, zone) and the first
    /// violation is returned. Names are normalized to end with the root
    /// separator; a name that is empty or only the separator is rejected.
    pub fn new<I, S>(names: I, record_type: &str, ttl: i64, hosted_zone_id: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for (index, name) in names.into_iter().enumerate() {
            let name = name.as_ref();
            if name.trim_end_matches(ROOT_SEPARATOR).is_empty() {
                return Err(DynDnsError::EmptyRecordName(index));
            }
            normalized.push(normalize_name(name));
        }
        if normalized.is_empty() {
            return Err(DynDnsError::NoRecordNames);
        }

        let record_type = record_type.parse()?;

        if ttl < 1 {
            return Err(DynDnsError::InvalidTtl(ttl));
        }

        if hosted_zone_id.is_empty() {
            return Err(DynDnsError::MissingHostedZone);
        }

        Ok(Self {
            names: normalized,
            value: String::new(),
            record_type,
            ttl,
            hosted_zone_id: hosted_zone_id.to_string(),
        })
    }

    /// Assign the address every record in the set should point at.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Address to publish; empty until assigned.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    pub fn hosted_zone_id(&self) -> &str {
        &self.hosted_zone_id
    }
}
