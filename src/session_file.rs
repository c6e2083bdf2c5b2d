//! Persisted session secret.
//!
//! The browser build of this app leaned on provider-managed cookies to
//! survive restarts; a CLI process has to persist the session secret itself.
//! The secret is stored as JSON under `~/.rolodex/.session.json` with
//! owner-only file permissions.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File name the session is stored under.
const SESSION_FILE: &str = ".session.json";

/// Directory under the home directory holding client state.
const STATE_DIR: &str = ".rolodex";

/// The persisted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Session secret replayed in the session header.
    pub secret: String,
    /// Principal id the secret was issued for.
    pub user_id: String,
}

/// Loads, saves, and clears the persisted session.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// Session file in the default location.
    ///
    /// Returns `None` when the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self {
            path: home.join(STATE_DIR).join(SESSION_FILE),
        })
    }

    /// Session file at an explicit path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the session is stored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session, if one exists and parses.
    pub fn load(&self) -> Option<StoredSession> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("ignoring unreadable session file: {}", e);
                None
            }
        }
    }

    /// Persist a session. Returns false when the write fails.
    pub fn save(&self, session: &StoredSession) -> bool {
        if let Some(parent) = self.path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return false;
            }
        }
        let Ok(contents) = serde_json::to_string_pretty(session) else {
            return false;
        };
        if fs::write(&self.path, contents).is_err() {
            return false;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600));
        }
        true
    }

    /// Delete the stored session. Returns true when no session remains.
    pub fn clear(&self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn session() -> StoredSession {
        StoredSession {
            secret: "s3cret".to_string(),
            user_id: "u1".to_string(),
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let file = SessionFile::at_path(dir.path().join("state").join(".session.json"));

        assert_eq!(file.load(), None);
        assert!(file.save(&session()));
        assert_eq!(file.load(), Some(session()));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let file = SessionFile::at_path(dir.path().join(".session.json"));

        assert!(file.clear());
        file.save(&session());
        assert!(file.clear());
        assert_eq!(file.load(), None);
        assert!(file.clear());
    }

    #[test]
    fn test_corrupt_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".session.json");
        std::fs::write(&path, "not json").unwrap();

        let file = SessionFile::at_path(&path);
        assert_eq!(file.load(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let file = SessionFile::at_path(dir.path().join(".session.json"));
        file.save(&session());

        let mode = std::fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
