//! Last published address, cached on disk.

use crate::error::{DynDnsError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Cache file name, created in the working directory.
pub const STATE_FILE_NAME: &str = ".dyndns53-ip";

/// Permissions applied to the cache file.
#[cfg(unix)]
const STATE_FILE_MODE: u32 = 0o644;

/// Last address known to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedAddress {
    /// No usable cache (missing, unreadable or empty file).
    Absent,
    Present(String),
}

impl CachedAddress {
    pub fn as_str(&self) -> &str {
        match self {
            CachedAddress::Absent => "",
            CachedAddress::Present(ip) => ip,
        }
    }

    /// Whether `ip` equals the cached address. An absent cache compares as "".
    pub fn matches(&self, ip: &str) -> bool {
        self.as_str() == ip
    }
}

/// Single-file store for the last published address.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the current working directory.
    pub fn in_working_dir() -> Self {
        Self::new(STATE_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached address. Read failures are treated as no cache.
    pub fn read(&self) -> CachedAddress {
        match fs::read_to_string(&self.path) {
            Ok(ip) if !ip.is_empty() => CachedAddress::Present(ip),
            Ok(_) => CachedAddress::Absent,
            Err(e) => {
                tracing::debug!("No cached address at {}: {}", self.path.display(), e);
                CachedAddress::Absent
            }
        }
    }

    /// Replace the cached address. The file holds exactly `ip`, no newline.
    pub fn write(&self, ip: &str) -> Result<()> {
        let wrap = |error: std::io::Error| DynDnsError::StateWrite {
            path: self.path.clone(),
            error,
        };

        fs::write(&self.path, ip).map_err(wrap)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(STATE_FILE_MODE))
                .map_err(wrap)?;
        }

        Ok(())
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::in_working_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PROG_NAME;

    #[test]
    fn test_file_name_follows_program_name() {
        assert_eq!(STATE_FILE_NAME, format!(".{}-ip", PROG_NAME));
        assert_eq!(StateStore::default().path(), Path::new(".dyndns53-ip"));
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join(STATE_FILE_NAME));

        let cached = store.read();
        assert_eq!(cached, CachedAddress::Absent);
        assert!(!cached.matches("9.9.9.9"));
    }

    #[test]
    fn test_empty_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATE_FILE_NAME);
        fs::write(&path, "").unwrap();

        assert_eq!(StateStore::new(path).read(), CachedAddress::Absent);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join(STATE_FILE_NAME));

        store.write("1.2.3.4").unwrap();
        store.write("5.6.7.8").unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "5.6.7.8");
        let cached = store.read();
        assert_eq!(cached, CachedAddress::Present("5.6.7.8".to_string()));
        assert!(cached.matches("5.6.7.8"));
        assert!(!cached.matches("1.2.3.4"));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join(STATE_FILE_NAME));
        store.write("1.2.3.4").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("missing").join(STATE_FILE_NAME));

        let err = store.write("1.2.3.4").unwrap_err();
        assert!(matches!(err, DynDnsError::StateWrite { .. }));
    }
}
