//! Persisted authentication token.
//!
//! Two keys are written: `token`, always, and `rememberMe`, present as the
//! string `"true"` only when the user asked to be remembered. The token is
//! stored verbatim and never validated.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub const TOKEN_KEY: &str = "token";
pub const REMEMBER_ME_KEY: &str = "rememberMe";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("storage file {} is not a JSON object: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize storage: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key/value storage, the shape of browser local storage.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Volatile storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage backed by a JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| StorageError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Storage saved: {}", self.path.display());
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// Reads and writes the session token.
#[derive(Debug)]
pub struct TokenStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> TokenStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Store `token` and set or clear the remember-me flag.
    pub fn set_token(&mut self, token: &str, remember_me: bool) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)?;
        if remember_me {
            self.storage.set(REMEMBER_ME_KEY, "true")
        } else {
            self.storage.remove(REMEMBER_ME_KEY)
        }
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    pub fn remember_me(&self) -> bool {
        self.storage.get(REMEMBER_ME_KEY).as_deref() == Some("true")
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
