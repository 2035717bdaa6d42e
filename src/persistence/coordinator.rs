//! Save coordination across the remote store and the local cache
//!
//! The two tiers are not transactional as a pair: a remote success followed
//! by a local failure still reports `RemoteSucceeded`. No retries.

use crate::remote::{AvailabilityMonitor, RemoteService, SaveMode};
use crate::sources::LocalCache;
use crate::types::StudentRecord;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Which tier ended up holding the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SaveOutcome {
    RemoteSucceeded,
    LocalOnly,
    Failed,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        !matches!(self, SaveOutcome::Failed)
    }
}

impl std::fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SaveOutcome::RemoteSucceeded => "saved remotely and cached locally",
            SaveOutcome::LocalOnly => "saved to local cache only",
            SaveOutcome::Failed => "save failed",
        };
        f.write_str(label)
    }
}

pub struct PersistenceCoordinator {
    remote: Arc<dyn RemoteService>,
    monitor: Arc<AvailabilityMonitor>,
    cache: Arc<LocalCache>,
}

impl PersistenceCoordinator {
    pub fn new(
        remote: Arc<dyn RemoteService>,
        monitor: Arc<AvailabilityMonitor>,
        cache: Arc<LocalCache>,
    ) -> Self {
        Self {
            remote,
            monitor,
            cache,
        }
    }

    /// Store `students` for `owner`: remote first when reachable, then the local cache
    pub async fn save(&self, owner: &str, students: &[StudentRecord]) -> SaveOutcome {
        if owner.trim().is_empty() {
            warn!("Refusing to save without an owner identity");
            return SaveOutcome::Failed;
        }

        let remote_saved = if self.monitor.check(false).await {
            match self.remote.save_owner(owner, students, SaveMode::Replace).await {
                Ok(_) => {
                    debug!(owner, count = students.len(), "Saved to remote store");
                    true
                }
                Err(e) => {
                    warn!(owner, "Remote save failed: {}", e);
                    false
                }
            }
        } else {
            debug!(owner, "Remote store unavailable, saving locally only");
            false
        };

        let local_saved = match self.cache.store(owner, students).await {
            Ok(_) => true,
            Err(e) => {
                error!(owner, "Local cache write failed: {}", e);
                false
            }
        };

        let outcome = match (remote_saved, local_saved) {
            (true, _) => SaveOutcome::RemoteSucceeded,
            (false, true) => SaveOutcome::LocalOnly,
            (false, false) => SaveOutcome::Failed,
        };
        info!(owner, %outcome, "Save finished");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Result, ShieldError};
    use crate::remote::HealthProbe;
    use crate::types::RawRow;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FixedProbe(bool);

    #[async_trait]
    impl HealthProbe for FixedProbe {
        async fn probe(&self) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingRemote {
        fail: bool,
        saves: Mutex<Vec<(String, usize, SaveMode)>>,
    }

    #[async_trait]
    impl RemoteService for RecordingRemote {
        async fn predict_bulk(&self, _records: &[StudentRecord]) -> Result<Vec<RawRow>> {
            Ok(Vec::new())
        }

        async fn fetch_owner(&self, _owner: &str) -> Result<Vec<RawRow>> {
            Ok(Vec::new())
        }

        async fn save_owner(&self, owner: &str, students: &[StudentRecord], mode: SaveMode) -> Result<Vec<RawRow>> {
            if self.fail {
                return Err(ShieldError::Transport("connection reset".to_string()));
            }
            self.saves
                .lock()
                .unwrap()
                .push((owner.to_string(), students.len(), mode));
            Ok(Vec::new())
        }

        async fn fetch_aggregate(&self) -> Result<Vec<RawRow>> {
            Ok(Vec::new())
        }
    }

    fn coordinator(up: bool, remote: Arc<RecordingRemote>, cache_dir: &std::path::Path) -> PersistenceCoordinator {
        let monitor = Arc::new(AvailabilityMonitor::new(Arc::new(FixedProbe(up))));
        PersistenceCoordinator::new(remote, monitor, Arc::new(LocalCache::new(cache_dir)))
    }

    fn students(n: usize) -> Vec<StudentRecord> {
        (0..n)
            .map(|i| StudentRecord {
                id: (i + 1).to_string(),
                name: format!("S{}", i + 1),
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_remote_and_local() {
        let dir = TempDir::new().unwrap();
        let remote = Arc::new(RecordingRemote::default());
        let coordinator = coordinator(true, remote.clone(), dir.path());

        let outcome = coordinator.save("teacher1", &students(2)).await;
        assert_eq!(outcome, SaveOutcome::RemoteSucceeded);
        assert_eq!(
            remote.saves.lock().unwrap().as_slice(),
            &[("teacher1".to_string(), 2, SaveMode::Replace)]
        );
        let cached = LocalCache::new(dir.path()).load("teacher1").await.unwrap();
        assert_eq!(cached.len(), 2);
    }

    #[tokio::test]
    async fn test_offline_saves_locally() {
        let dir = TempDir::new().unwrap();
        let remote = Arc::new(RecordingRemote::default());
        let coordinator = coordinator(false, remote.clone(), dir.path());

        assert_eq!(coordinator.save("teacher1", &students(1)).await, SaveOutcome::LocalOnly);
        assert!(remote.saves.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_saves_locally() {
        let dir = TempDir::new().unwrap();
        let remote = Arc::new(RecordingRemote {
            fail: true,
            ..Default::default()
        });
        let coordinator = coordinator(true, remote, dir.path());
        assert_eq!(coordinator.save("teacher1", &students(1)).await, SaveOutcome::LocalOnly);
    }

    #[tokio::test]
    async fn test_local_failure_after_remote_success() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let coordinator = coordinator(true, Arc::new(RecordingRemote::default()), &blocker);
        assert_eq!(coordinator.save("t", &students(1)).await, SaveOutcome::RemoteSucceeded);
    }

    #[tokio::test]
    async fn test_both_tiers_fail() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let coordinator = coordinator(false, Arc::new(RecordingRemote::default()), &blocker);
        let outcome = coordinator.save("t", &students(1)).await;
        assert_eq!(outcome, SaveOutcome::Failed);
        assert!(!outcome.is_saved());
    }

    #[tokio::test]
    async fn test_empty_owner_fails() {
        let dir = TempDir::new().unwrap();
        let coordinator = coordinator(true, Arc::new(RecordingRemote::default()), dir.path());
        assert_eq!(coordinator.save("  ", &students(1)).await, SaveOutcome::Failed);
    }

    #[tokio::test]
    async fn test_concurrent_saves_leave_a_whole_file() {
        let dir = TempDir::new().unwrap();
        let coordinator = Arc::new(coordinator(false, Arc::new(RecordingRemote::default()), dir.path()));

        let handles: Vec<_> = (1..=8)
            .map(|n| {
                let coordinator = coordinator.clone();
                tokio::spawn(async move { coordinator.save("teacher1", &students(n)).await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap(), SaveOutcome::LocalOnly);
        }

        let cached = LocalCache::new(dir.path()).load("teacher1").await.unwrap();
        assert!((1..=8).contains(&cached.len()));
        assert_eq!(cached, students(cached.len()));
    }
}
