use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to write session file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode session values: {0}")]
    Encode(#[from] simd_json::Error),
}

/// Session-scoped string storage. Survives restarts of the view within one
/// terminal session (same session id); another session id starts empty.
pub struct SessionStorage {
    path: Option<PathBuf>,
    values: RefCell<BTreeMap<String, String>>,
}

impl SessionStorage {
    /// Storage backed by a file in the system temp dir
    pub fn open(session_id: &str) -> Self {
        Self::open_in(&std::env::temp_dir(), session_id)
    }

    /// Storage backed by a file in `dir`
    pub fn open_in(dir: &Path, session_id: &str) -> Self {
        let path = dir.join(session_file_name(session_id));
        let values = read_values(&path);
        Self {
            path: Some(path),
            values: RefCell::new(values),
        }
    }

    /// Storage that lives only as long as this value
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn flush(&self) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let encoded = simd_json::serde::to_string(&*self.values.borrow())?;
        fs::write(path, encoded).map_err(|source| SessionError::Write {
            path: path.clone(),
            source,
        })
    }
}

/// Terminal session ids may carry separators; keep the file name flat
fn session_file_name(session_id: &str) -> String {
    let id: String = session_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("region-pulse-session-{id}.json")
}

fn read_values(path: &Path) -> BTreeMap<String, String> {
    let Ok(mut bytes) = fs::read(path) else {
        return BTreeMap::new();
    };
    match simd_json::serde::from_slice(&mut bytes) {
        Ok(values) => values,
        Err(err) => {
            tracing::warn!(
                target: "region_pulse::session",
                path = %path.display(),
                error = %err,
                "session.discarded_unreadable"
            );
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_in_memory_round_trip() {
        let storage = SessionStorage::in_memory();
        assert_eq!(storage.get("mapStatistic"), None);
        storage.set("mapStatistic", "deceased").unwrap();
        assert_eq!(storage.get("mapStatistic").as_deref(), Some("deceased"));
        assert!(storage.path().is_none());
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempdir().unwrap();
        let first = SessionStorage::open_in(dir.path(), "tty3");
        first.set("mapStatistic", "recovered").unwrap();

        let second = SessionStorage::open_in(dir.path(), "tty3");
        assert_eq!(second.get("mapStatistic").as_deref(), Some("recovered"));
    }

    #[test]
    fn test_fresh_session_starts_empty() {
        let dir = tempdir().unwrap();
        SessionStorage::open_in(dir.path(), "tty3")
            .set("mapStatistic", "recovered")
            .unwrap();
        let storage = SessionStorage::open_in(dir.path(), "tty4");
        assert_eq!(storage.get("mapStatistic"), None);
    }

    #[test]
    fn test_session_id_is_flattened_into_file_name() {
        let dir = tempdir().unwrap();
        let storage = SessionStorage::open_in(dir.path(), "w0t1p0:6B2A/../x");
        let path = storage.path().unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("region-pulse-session-w0t1p0_6B2A____x.json")
        );
    }

    #[test]
    fn test_unreadable_file_starts_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(session_file_name("tty3")), "{not json").unwrap();
        let storage = SessionStorage::open_in(dir.path(), "tty3");
        assert_eq!(storage.get("mapStatistic"), None);
    }
}
