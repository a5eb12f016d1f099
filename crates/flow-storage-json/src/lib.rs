//! flow-storage-json
//!
//! Filesystem-backed slot for the persisted transaction collection.

use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use flow_core::{CoreError, TransactionStorage};
use tracing::debug;

const SLOT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Single JSON file holding the whole collection. Writes stage to a sibling temp
/// file and rename over the target, so readers see either the old or the new payload.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Slot `<dir>/<canonical slot name>.json`, creating `dir` if needed.
    pub fn in_dir(dir: &Path, slot_name: &str) -> Result<Self, CoreError> {
        let path = slot_path(dir, slot_name)?;
        fs::create_dir_all(dir)?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransactionStorage for JsonFileStorage {
    fn read(&self) -> Result<Option<Vec<u8>>, CoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, payload: &[u8]) -> Result<(), CoreError> {
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), bytes = payload.len(), "Persisted transactions.");
        Ok(())
    }
}

/// Resolves the file path for a slot name inside `dir`.
pub fn slot_path(dir: &Path, slot_name: &str) -> Result<PathBuf, CoreError> {
    let name = canonical_name(slot_name).ok_or_else(|| {
        CoreError::Storage(format!("slot name `{slot_name}` has no usable characters"))
    })?;
    Ok(dir.join(format!("{name}.{SLOT_EXTENSION}")))
}

fn canonical_name(name: &str) -> Option<String> {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}
