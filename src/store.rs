use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A key-value store of strings that survives restarts of the program
pub(crate) trait Persistence {
    fn get(&self, key: &str) -> Option<&str>;

    /// Store `value` under `key`.  The value remains readable via `get()`
    /// for the rest of the session even if writing it out fails.
    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
}

/// A [`Persistence`] implementation that keeps its entries in memory and
/// writes them out as a JSON object whenever one changes.
///
/// A `FileStore` without a path never touches the disk.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct FileStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Create a store that only lives as long as the program
    pub(crate) fn in_memory() -> FileStore {
        FileStore::default()
    }

    /// Open the store backed by the file at `path`.  A missing file is
    /// treated as an empty store.
    pub(crate) fn open(path: PathBuf) -> Result<FileStore, LoadError> {
        let entries = match fs_err::read(&path) {
            Ok(src) => serde_json::from_slice(&src).map_err(LoadError::deserialize)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(LoadError::read(e)),
        };
        Ok(FileStore {
            path: Some(path),
            entries,
        })
    }

    /// Create an empty store that will be written to `path`, without
    /// reading anything already there
    #[cfg(test)]
    pub(crate) fn with_path(path: PathBuf) -> FileStore {
        FileStore {
            path: Some(path),
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn save(&self) -> Result<(), SaveError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src = serde_json::to_string_pretty(&self.entries).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(path, &src).map_err(SaveError::write)?;
        Ok(())
    }
}

impl Persistence for FileStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.save()
    }
}

#[derive(Debug, Error)]
#[error("Failed to save data to disk")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize store")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write store to disk")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Failed to read saved data from disk")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    pub(crate) fn no_path() -> Self {
        LoadError(LoadErrorSource::NoPath)
    }

    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    fn deserialize(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(e))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to read store file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize store")]
    Deserialize(#[source] serde_json::Error),
}
