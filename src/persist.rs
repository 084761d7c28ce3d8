//! Session-boundary persistence for vault entries.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Result, VaultError};
use crate::models::VaultEntry;

/// Collaborator that loads and saves the entry store at session
/// boundaries. The engine itself never touches disk.
pub trait VaultPersistence {
    fn load_all(&self) -> Result<Vec<VaultEntry>>;
    fn save_all(&self, entries: &[VaultEntry]) -> Result<()>;
}

/// Plaintext JSON file store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create an empty vault file.
    ///
    /// Fails with `VaultExists` when the file is already present, unless
    /// `force` is set.
    pub fn init(&self, force: bool) -> Result<()> {
        if self.path.exists() && !force {
            return Err(VaultError::VaultExists(self.path.clone()));
        }
        self.save_all(&[])
    }
}

impl VaultPersistence for JsonFileStore {
    fn load_all(&self) -> Result<Vec<VaultEntry>> {
        if !self.path.exists() {
            return Err(VaultError::VaultNotFound(self.path.clone()));
        }
        let content = fs::read_to_string(&self.path)?;
        let entries = serde_json::from_str(&content)?;
        Ok(entries)
    }

    fn save_all(&self, entries: &[VaultEntry]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;

        // Write into a temp file in the target directory, then rename,
        // so a crash mid-write never leaves a half-written vault.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o600))?;
        }

        tmp.persist(&self.path).map_err(|e| VaultError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, EntryDraft};
    use crate::store::EntryStore;

    fn sample_entries() -> Vec<VaultEntry> {
        let mut store = EntryStore::new();
        store
            .add(EntryDraft {
                title: "GitHub".to_string(),
                username: "emmachuka@gmail.com".to_string(),
                password: "SecurePass123!@#".to_string(),
                url: Some("https://github.com".to_string()),
                notes: Some("Primary development account".to_string()),
                category: Category::Login,
                favorite: true,
            })
            .unwrap();
        store
            .add(EntryDraft {
                title: "Recovery codes".to_string(),
                category: Category::SecureNote,
                ..Default::default()
            })
            .unwrap();
        store.list().to_vec()
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonFileStore::new(dir.path().join("vault.json"));

        let entries = sample_entries();
        file.save_all(&entries).unwrap();
        let loaded = file.load_all().unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonFileStore::new(dir.path().join("missing.json"));
        assert!(matches!(
            file.load_all(),
            Err(VaultError::VaultNotFound(_))
        ));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonFileStore::new(dir.path().join("vault.json"));

        file.init(false).unwrap();
        assert!(matches!(file.init(false), Err(VaultError::VaultExists(_))));
        file.init(true).unwrap();
        assert!(file.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.json");
        fs::write(&path, "{ not json").unwrap();

        let file = JsonFileStore::new(path);
        assert!(matches!(
            file.load_all(),
            Err(VaultError::Serialization(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = JsonFileStore::new(dir.path().join("vault.json"));
        file.save_all(&sample_entries()).unwrap();

        let mode = fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
