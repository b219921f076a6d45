use crate::api::VaultApi;
use crate::config::VaultConfig;
use crate::error::{Result, VaultError};
use crate::ranking::{RankMapping, RANK_MAPPING_FILENAME};
use crate::session::Session;
use crate::store::fs::{FileStore, STORE_FILENAME};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Overrides the data directory when `--data-dir` is not given.
pub const DATA_DIR_ENV: &str = "RANKVAULT_DATA";

pub struct VaultContext {
    pub api: VaultApi<FileStore>,
    pub session: Session,
    pub data_dir: PathBuf,
}

/// `--data-dir`, then `RANKVAULT_DATA`, then the platform data directory.
pub fn resolve_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "rankvault", "rankvault")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| VaultError::Config("Could not determine data directory".to_string()))
}

/// Rank mapping location: the configured override, else next to the store.
pub fn mapping_path(data_dir: &Path, config: &VaultConfig) -> PathBuf {
    match &config.rank_mapping_file {
        Some(file) => data_dir.join(file),
        None => data_dir.join(RANK_MAPPING_FILENAME),
    }
}

/// Loads everything a shell needs. A store that cannot be read or created is
/// fatal; a missing or broken rank mapping is not.
pub fn initialize(override_dir: Option<&Path>) -> Result<VaultContext> {
    let data_dir = resolve_data_dir(override_dir)?;
    log::debug!("Data directory: {}", data_dir.display());

    let config = VaultConfig::load(&data_dir)?;
    let store = FileStore::load_or_init(data_dir.join(STORE_FILENAME))?;
    let mapping = RankMapping::load(mapping_path(&data_dir, &config));
    let session = Session::load(&data_dir).unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable session file: {}", e);
        Session::default()
    });

    Ok(VaultContext {
        api: VaultApi::new(store, mapping, config),
        session,
        data_dir,
    })
}
