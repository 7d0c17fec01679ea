//! Local storage for generated PDFs.
//!
//! Each saved document gets its own file in the store's directory and a
//! `file://` URL the user can open. One save, one new artifact.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Local;
use reqwest::Url;
use thiserror::Error;
use tracing::debug;

use crate::export::PdfDocument;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to create {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A PDF written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdfArtifact {
    pub path: PathBuf,
    pub url: String,
    pub size: usize,
}

/// Writes PDFs into one directory, numbering them in save order.
#[derive(Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
    next_id: AtomicU64,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `doc` to a new file and return its location.
    pub fn save(&self, doc: &PdfDocument) -> Result<PdfArtifact, ArtifactError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        let dir = std::fs::canonicalize(&self.dir)
            .or_else(|_| std::path::absolute(&self.dir))
            .unwrap_or_else(|_| self.dir.clone());

        // Never reuse a name: another store (or another process) may be
        // writing into the same directory.
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let (path, mut file) = loop {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let path = dir.join(format!("rdo-{stamp}-{id}.pdf"));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(ArtifactError::Write { path, source }),
            }
        };

        file.write_all(doc.bytes())
            .map_err(|source| ArtifactError::Write {
                path: path.clone(),
                source,
            })?;
        debug!("Saved PDF: {} ({} bytes)", path.display(), doc.len());

        Ok(PdfArtifact {
            url: file_url(&path),
            path,
            size: doc.len(),
        })
    }
}

fn file_url(path: &Path) -> String {
    Url::from_file_path(path)
        .map(String::from)
        .unwrap_or_else(|()| format!("file://{}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> PdfDocument {
        PdfDocument::from_bytes(b"%PDF-1.4 test".to_vec()).unwrap()
    }

    #[test]
    fn save_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("out"));
        let artifact = store.save(&doc()).unwrap();

        assert!(artifact.path.exists());
        assert_eq!(std::fs::read(&artifact.path).unwrap(), b"%PDF-1.4 test");
        assert!(artifact.url.starts_with("file://"));
        assert!(artifact.url.ends_with(".pdf"));
        assert_eq!(artifact.size, 13);
    }

    #[test]
    fn each_save_is_a_new_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let a = store.save(&doc()).unwrap();
        let b = store.save(&doc()).unwrap();
        assert_ne!(a.path, b.path);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn stores_sharing_a_directory_never_overwrite_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let first = ArtifactStore::new(dir.path());
        let second = ArtifactStore::new(dir.path());

        let a = first
            .save(&PdfDocument::from_bytes(b"%PDF-first".to_vec()).unwrap())
            .unwrap();
        let b = second
            .save(&PdfDocument::from_bytes(b"%PDF-second".to_vec()).unwrap())
            .unwrap();

        assert_ne!(a.url, b.url);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
        assert_eq!(std::fs::read(&a.path).unwrap(), b"%PDF-first");
        assert_eq!(std::fs::read(&b.path).unwrap(), b"%PDF-second");
    }

    #[test]
    fn url_survives_spaces_and_hashes_in_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("my dir#1"));
        let artifact = store.save(&doc()).unwrap();

        let url = Url::parse(&artifact.url).unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.fragment().is_none());
        assert!(artifact.url.contains("my%20dir%231"));
        assert_eq!(url.to_file_path().unwrap(), artifact.path);
    }
}
