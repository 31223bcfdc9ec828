//! JSON state file with atomic replace (temp file, fsync, rename).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use nudge_core::errors::{ConfigError, NudgeError, NudgeResult, StorageError};
use nudge_core::models::CumulativeState;
use nudge_core::traits::StateStore;

use super::envelope::StateEnvelope;
use crate::to_io_err;

pub struct JsonStateStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> NudgeResult<Option<CumulativeState>> {
        let shown = self.path.display().to_string();
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::IncompatibleState {
                    path: shown,
                    message: format!("unreadable: {e}"),
                }
                .into())
            }
        };
        let envelope: StateEnvelope =
            serde_json::from_slice(&bytes).map_err(|e| ConfigError::IncompatibleState {
                path: shown.clone(),
                message: format!("malformed: {e}"),
            })?;
        let state = envelope.open(&shown)?;
        tracing::debug!(path = %shown, revision = state.revision, "state loaded");
        Ok(Some(state))
    }

    fn save(&self, state: &CumulativeState) -> NudgeResult<()> {
        let mut bytes = serde_json::to_vec_pretty(&StateEnvelope::seal(state)?)?;
        bytes.push(b'\n');

        let _guard = self.write_lock.lock().map_err(|_| {
            NudgeError::Storage(StorageError::LockPoisoned {
                resource: "state file".to_string(),
            })
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| to_io_err(parent, e))?;
        }

        let tmp = self.temp_path();
        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            Ok(())
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(to_io_err(&tmp, e));
        }
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            to_io_err(&self.path, e)
        })?;
        sync_parent_dir(&self.path);

        tracing::debug!(path = %self.path.display(), revision = state.revision, "state saved");
        Ok(())
    }
}

/// Persist the rename itself. Best effort: not every platform lets a
/// directory be opened for sync.
fn sync_parent_dir(path: &Path) {
    #[cfg(unix)]
    {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Ok(dir) = fs::File::open(parent) {
                let _ = dir.sync_all();
            }
        }
    }
    #[cfg(not(unix))]
    let _ = path;
}
