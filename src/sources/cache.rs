//! Per-identity JSON cache on local disk
//!
//! One file per identity holding the raw student array. Writes go to a
//! temporary sibling first and are renamed into place, so readers never
//! see a partially written file.

use crate::errors::{Result, ShieldError};
use crate::schema::normalize_rows;
use crate::sources::{file_safe, DataSource};
use crate::types::{raw_row_from_json, Identity, Origin, RawRow, Snapshot, StudentRecord};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

pub const CACHE_FILE_PREFIX: &str = "dropoutshield-teacher-";

/// File-backed student cache
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, owner: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}.json", CACHE_FILE_PREFIX, file_safe(owner)))
    }

    /// Cached students for `owner`; a missing file is an empty cache
    pub async fn load(&self, owner: &str) -> Result<Vec<StudentRecord>> {
        let path = self.path_for(owner);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let objects: Vec<Map<String, Value>> = serde_json::from_slice(&bytes).map_err(|e| {
            ShieldError::Format(format!("cache file {}: {}", path.display(), e))
        })?;
        let rows: Vec<RawRow> = objects.iter().map(raw_row_from_json).collect();
        let (records, _) = normalize_rows(&rows);
        debug!(owner, count = records.len(), "Loaded cached students");
        Ok(records)
    }

    /// Replace the cached students for `owner`
    pub async fn store(&self, owner: &str, students: &[StudentRecord]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(owner);
        let json = serde_json::to_vec_pretty(students)?;
        let tmp = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&tmp, &json).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(owner, count = students.len(), path = %path.display(), "Cached students");
        Ok(path)
    }

    /// Remove the cache file for `owner`, if any
    pub async fn clear(&self, owner: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(owner)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Local cache as a resolver source
pub struct CacheSource {
    cache: Arc<LocalCache>,
    known: Vec<String>,
}

impl CacheSource {
    pub fn new(cache: Arc<LocalCache>, known: Vec<String>) -> Self {
        Self { cache, known }
    }
}

#[async_trait]
impl DataSource for CacheSource {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn load(&self, identity: &Identity) -> Result<Option<Snapshot>> {
        let students = match identity {
            Identity::Owner(owner) => self.cache.load(owner).await?,
            Identity::Aggregate => {
                let mut merged = Vec::new();
                for owner in &self.known {
                    match self.cache.load(owner).await {
                        Ok(students) => merged.extend(
                            students.into_iter().map(|s| s.with_provenance(owner)),
                        ),
                        Err(e) => warn!(owner = owner.as_str(), "Skipping unreadable cache: {}", e),
                    }
                }
                merged
            }
        };

        if students.is_empty() {
            return Ok(None);
        }
        Ok(Some(Snapshot::unscored(Origin::Cache, students)))
    }
}
