//! File-backed snapshot store

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::semantic_cache::{
    CacheSnapshot, SemanticCacheConfig, SemanticIndex, SnapshotMetadata, SnapshotStore,
};
use crate::domain::DomainError;

/// Stores the index snapshot and metadata document as two sibling files.
///
/// Each write goes to a `.tmp` sibling that is then renamed over the target.
/// The two renames are separate, so a crash between them leaves a new index
/// beside the previous metadata document. Loading such a pair fails with
/// `IndexCorrupt`; `snapshot repair` truncates it back to the entries both
/// files agree on.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    index_path: PathBuf,
    metadata_path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(index_path: impl Into<PathBuf>, metadata_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            metadata_path: metadata_path.into(),
        }
    }

    pub fn from_config(config: &SemanticCacheConfig) -> Self {
        Self::new(&config.index_path, &config.metadata_path)
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    async fn exists(path: &Path) -> Result<bool, DomainError> {
        fs::try_exists(path).await.map_err(|e| {
            DomainError::persistence(format!("Failed to stat {}: {}", path.display(), e))
        })
    }

    async fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), DomainError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::persistence(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let tmp = temp_sibling(path);

        fs::write(&tmp, contents).await.map_err(|e| {
            DomainError::persistence(format!("Failed to write {}: {}", tmp.display(), e))
        })?;

        fs::rename(&tmp, path).await.map_err(|e| {
            DomainError::persistence(format!(
                "Failed to move {} into place: {}",
                path.display(),
                e
            ))
        })
    }

    async fn remove(path: &Path) -> Result<bool, DomainError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::persistence(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self) -> Result<Option<CacheSnapshot>, DomainError> {
        if !Self::exists(&self.index_path).await? {
            if Self::exists(&self.metadata_path).await? {
                warn!(
                    metadata = %self.metadata_path.display(),
                    "Metadata document found without index snapshot, starting empty"
                );
            }
            return Ok(None);
        }

        let index_bytes = fs::read(&self.index_path).await.map_err(|e| {
            DomainError::persistence(format!(
                "Failed to read {}: {}",
                self.index_path.display(),
                e
            ))
        })?;

        let metadata_bytes = match fs::read(&self.metadata_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DomainError::index_corrupt(format!(
                    "Index snapshot {} has no metadata document at {}",
                    self.index_path.display(),
                    self.metadata_path.display()
                )));
            }
            Err(e) => {
                return Err(DomainError::persistence(format!(
                    "Failed to read {}: {}",
                    self.metadata_path.display(),
                    e
                )));
            }
        };

        let index = SemanticIndex::from_bytes(&index_bytes)?;
        let metadata: SnapshotMetadata = serde_json::from_slice(&metadata_bytes).map_err(|e| {
            DomainError::index_corrupt(format!(
                "Undecodable metadata document {}: {}",
                self.metadata_path.display(),
                e
            ))
        })?;

        debug!(
            index = %self.index_path.display(),
            entries = index.len(),
            "Loaded semantic cache snapshot"
        );

        Ok(Some(CacheSnapshot::new(index, metadata)))
    }

    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError> {
        let metadata = serde_json::to_vec(&snapshot.metadata).map_err(|e| {
            DomainError::persistence(format!("Failed to encode metadata document: {}", e))
        })?;

        Self::write_atomically(&self.index_path, &snapshot.index.to_bytes()).await?;
        Self::write_atomically(&self.metadata_path, &metadata).await?;

        Ok(())
    }

    async fn reset(&self) -> Result<bool, DomainError> {
        let index_removed = Self::remove(&self.index_path).await?;
        let metadata_removed = Self::remove(&self.metadata_path).await?;

        Ok(index_removed || metadata_removed)
    }

    fn describe(&self) -> String {
        format!(
            "{} + {}",
            self.index_path.display(),
            self.metadata_path.display()
        )
    }
}
