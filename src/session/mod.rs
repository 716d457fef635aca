use crate::domain::EmployeeRecord;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// The persisted session is one serialized user record at a fixed path,
/// overwritten wholesale on every refresh. Absence of the record is the
/// sole signed-out signal — there is no token and no expiry.
pub trait SessionStore {
    fn load(&self) -> Option<EmployeeRecord>;
    fn save(&self, user: &EmployeeRecord) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<EmployeeRecord> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(user) => Some(user),
            Err(_) => {
                // a corrupt record is indistinguishable from signed out
                let _ = fs::remove_file(&self.path);
                None
            }
        }
    }

    fn save(&self, user: &EmployeeRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let content = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, content)
            .with_context(|| format!("writing session to {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("clearing {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user(email: &str) -> EmployeeRecord {
        serde_json::from_str(&format!(
            r#"{{ "email": "{}", "name": "Asha Rao", "isAdmin": true }}"#,
            email
        ))
        .unwrap()
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        store.save(&user("asha@example.com")).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.email, "asha@example.com");
        assert!(loaded.is_admin);
    }

    #[test]
    fn absent_file_means_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("missing.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn clear_signs_out_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        store.save(&user("asha@example.com")).unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_record_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.load().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn save_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        store.save(&user("old@example.com")).unwrap();
        store.save(&user("new@example.com")).unwrap();
        assert_eq!(store.load().unwrap().email, "new@example.com");
    }
}
