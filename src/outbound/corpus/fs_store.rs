//! Filesystem-backed corpus store.
//!
//! Uploaded files land under `{data_root}/users/{user_id}/documents/`. The
//! clear operation removes plain files only and leaves subdirectories
//! untouched.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::domain::UserId;
use crate::domain::ports::{CorpusStore, CorpusStoreError};

/// Corpus store rooted at a configurable data directory.
#[derive(Clone)]
pub struct FsCorpusStore {
    data_root: PathBuf,
}

impl FsCorpusStore {
    /// Create a store rooted at `data_root`.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }
}

/// Reject names that are empty or could escape the corpus directory.
fn sanitize_file_name(name: &str) -> Result<&str, CorpusStoreError> {
    let acceptable = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0');
    if acceptable {
        Ok(name)
    } else {
        Err(CorpusStoreError::invalid_file_name(name))
    }
}

fn io_error(err: std::io::Error) -> CorpusStoreError {
    CorpusStoreError::io(err.to_string())
}

#[async_trait]
impl CorpusStore for FsCorpusStore {
    async fn save_file(
        &self,
        user_id: &UserId,
        file_name: &str,
        source: &Path,
    ) -> Result<PathBuf, CorpusStoreError> {
        let file_name = sanitize_file_name(file_name)?;
        let dir = self.corpus_dir(user_id);
        fs::create_dir_all(&dir).await.map_err(io_error)?;
        let dest = dir.join(file_name);
        fs::copy(source, &dest).await.map_err(io_error)?;
        debug!(user_id = %user_id, path = %dest.display(), "stored corpus file");
        Ok(dest)
    }

    async fn clear(&self, user_id: &UserId) -> Result<usize, CorpusStoreError> {
        let dir = self.corpus_dir(user_id);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // A user who never uploaded has nothing to clear.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(io_error(err)),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let file_type = entry.file_type().await.map_err(io_error)?;
            if file_type.is_file() {
                fs::remove_file(entry.path()).await.map_err(io_error)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn corpus_dir(&self, user_id: &UserId) -> PathBuf {
        self.data_root
            .join("users")
            .join(user_id.to_string())
            .join("documents")
    }
}
