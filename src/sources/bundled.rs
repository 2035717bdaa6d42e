//! Bundled CSV snapshots shipped next to the application, one file per owner

use crate::errors::Result;
use crate::schema::ingest_file;
use crate::sources::{file_safe, DataSource};
use crate::types::{Identity, Origin, Snapshot, StudentRecord};
use async_trait::async_trait;
use futures_util::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct BundledFileSource {
    dir: PathBuf,
    known: Vec<String>,
}

impl BundledFileSource {
    pub fn new(dir: impl Into<PathBuf>, known: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            known,
        }
    }

    pub fn path_for(&self, owner: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", file_safe(owner)))
    }

    /// Students from `{dir}/{owner}.csv`, or `None` when there is no such file
    async fn load_owner(&self, owner: &str) -> Result<Option<Vec<StudentRecord>>> {
        let path = self.path_for(owner);
        if !exists(&path).await {
            debug!(owner, path = %path.display(), "No bundled snapshot");
            return Ok(None);
        }
        let ingested = ingest_file(&path).await?;
        Ok(Some(ingested.records))
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

#[async_trait]
impl DataSource for BundledFileSource {
    fn name(&self) -> &'static str {
        "bundled-file"
    }

    async fn load(&self, identity: &Identity) -> Result<Option<Snapshot>> {
        let students = match identity {
            Identity::Owner(owner) => match self.load_owner(owner).await? {
                Some(students) => students,
                None => return Ok(None),
            },
            Identity::Aggregate => {
                let loads = self.known.iter().map(|owner| async move {
                    (owner, self.load_owner(owner).await)
                });
                let mut merged = Vec::new();
                for (owner, result) in join_all(loads).await {
                    match result {
                        Ok(Some(students)) => merged.extend(
                            students.into_iter().map(|s| s.with_provenance(owner)),
                        ),
                        Ok(None) => {}
                        Err(e) => warn!(owner = owner.as_str(), "Skipping bundled snapshot: {}", e),
                    }
                }
                merged
            }
        };

        if students.is_empty() {
            return Ok(None);
        }
        Ok(Some(Snapshot::unscored(Origin::BundledFile, students)))
    }
}
