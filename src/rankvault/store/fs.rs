use super::AccountStore;
use crate::error::{Result, VaultError};
use crate::model::Root;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const STORE_FILENAME: &str = "accounts.json";

pub struct FileStore {
    path: PathBuf,
    root: Root,
}

impl FileStore {
    /// Reads the store document at `path`, or creates and persists an empty
    /// one when the file does not exist yet.
    pub fn load_or_init(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(VaultError::Io)?;
            let root: Root = serde_json::from_str(&content).map_err(VaultError::Serialization)?;
            log::debug!(
                "Loaded {} ({} servers, {} accounts)",
                path.display(),
                root.servers().len(),
                root.account_count()
            );
            return Ok(Self { path, root });
        }

        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let mut store = Self {
            path,
            root: Root::new(),
        };
        store.persist()?;
        log::info!("Created empty store at {}", store.path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    if path.exists() && !path.is_dir() {
        return Err(VaultError::Store(format!(
            "Path exists but is not a directory: {}",
            path.display()
        )));
    }
    if !path.exists() {
        fs::create_dir_all(path).map_err(VaultError::Io)?;
    }
    Ok(())
}

impl AccountStore for FileStore {
    fn root(&self) -> &Root {
        &self.root
    }

    fn root_mut(&mut self) -> &mut Root {
        &mut self.root
    }

    fn persist(&mut self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.root).map_err(VaultError::Serialization)?;

        // Atomic write: temp file in the same directory, then rename over
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let tmp_file = dir.join(format!(".accounts-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(VaultError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, &self.path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(VaultError::Io(e));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_empty_document_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data").join(STORE_FILENAME);

        let store = FileStore::load_or_init(&path).unwrap();
        assert!(store.root().servers().is_empty());

        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, serde_json::json!({ "servers": [] }));
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(STORE_FILENAME);
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            FileStore::load_or_init(&path),
            Err(VaultError::Serialization(_))
        ));
    }

    #[test]
    fn persist_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(STORE_FILENAME);
        let mut store = FileStore::load_or_init(&path).unwrap();
        store.root_mut().push_server("EUW".into());
        store.persist().unwrap();

        for entry in fs::read_dir(temp.path()).unwrap() {
            let name = entry.unwrap().file_name();
            let name = name.to_string_lossy();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }
}
