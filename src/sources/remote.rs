//! Remote predictor as a resolver source

use crate::errors::Result;
use crate::remote::{AvailabilityMonitor, RemoteService};
use crate::schema::normalize_row;
use crate::scoring::prediction_from_remote;
use crate::sources::DataSource;
use crate::types::{Identity, Origin, RawRow, Snapshot};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub struct RemoteSource {
    remote: Arc<dyn RemoteService>,
    monitor: Arc<AvailabilityMonitor>,
}

impl RemoteSource {
    pub fn new(remote: Arc<dyn RemoteService>, monitor: Arc<AvailabilityMonitor>) -> Self {
        Self { remote, monitor }
    }
}

/// Normalize remote rows and attach their predictions
pub fn snapshot_from_rows(rows: &[RawRow]) -> Snapshot {
    let (students, predictions) = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let student = normalize_row(row).record;
            let prediction = prediction_from_remote(index, &student, row);
            (student, prediction)
        })
        .unzip();
    Snapshot::scored(Origin::Remote, students, predictions)
}

#[async_trait]
impl DataSource for RemoteSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn load(&self, identity: &Identity) -> Result<Option<Snapshot>> {
        // owner views always re-check; the aggregate view tolerates the TTL
        let force = matches!(identity, Identity::Owner(_));
        if !self.monitor.check(force).await {
            debug!(%identity, "Remote predictor unavailable, skipping");
            return Ok(None);
        }

        let rows = match identity {
            Identity::Owner(owner) => self.remote.fetch_owner(owner).await?,
            Identity::Aggregate => self.remote.fetch_aggregate().await?,
        };
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(snapshot_from_rows(&rows)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ShieldError;
    use crate::remote::{HealthProbe, SaveMode};
    use crate::scoring::RiskTier;
    use crate::types::StudentRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProbe {
        up: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HealthProbe for CountingProbe {
        async fn probe(&self) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.up
        }
    }

    struct CannedRemote {
        owner_rows: Vec<RawRow>,
        fail: bool,
    }

    #[async_trait]
    impl RemoteService for CannedRemote {
        async fn predict_bulk(&self, _records: &[StudentRecord]) -> Result<Vec<RawRow>> {
            Ok(Vec::new())
        }

        async fn fetch_owner(&self, _owner: &str) -> Result<Vec<RawRow>> {
            if self.fail {
                return Err(ShieldError::Format("unexpected payload".to_string()));
            }
            Ok(self.owner_rows.clone())
        }

        async fn save_owner(&self, _owner: &str, _students: &[StudentRecord], _mode: SaveMode) -> Result<Vec<RawRow>> {
            Ok(Vec::new())
        }

        async fn fetch_aggregate(&self) -> Result<Vec<RawRow>> {
            Ok(self.owner_rows.clone())
        }
    }

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn source(up: bool, rows: Vec<RawRow>, fail: bool) -> (RemoteSource, Arc<CountingProbe>) {
        let probe = Arc::new(CountingProbe {
            up,
            calls: AtomicUsize::new(0),
        });
        let monitor = Arc::new(AvailabilityMonitor::new(probe.clone()));
        let remote = Arc::new(CannedRemote {
            owner_rows: rows,
            fail,
        });
        (RemoteSource::new(remote, monitor), probe)
    }

    #[test]
    fn test_snapshot_from_rows() {
        let rows = vec![
            row(&[("ID", "4"), ("Name", "Meera"), ("teacher_id", "t2"), ("dropout_probability_percent", "73.4")]),
            row(&[("id", "5"), ("attendance", "95"), ("avg_score", "90")]),
        ];
        let snapshot = snapshot_from_rows(&rows);
        assert_eq!(snapshot.origin, Origin::Remote);
        assert!(!snapshot.needs_scoring());
        assert_eq!(snapshot.students[0].name, "Meera");
        assert_eq!(snapshot.predictions[0].probability, 0.734);
        assert_eq!(snapshot.predictions[0].risk_tier, RiskTier::High);
        assert_eq!(snapshot.predictions[0].provenance.as_deref(), Some("t2"));
        // no remote probability: heuristic
        assert_eq!(snapshot.predictions[1].risk_tier, RiskTier::Low);
    }

    #[tokio::test]
    async fn test_owner_forces_probe() {
        let (source, probe) = source(true, vec![row(&[("id", "1")])], false);
        source.load(&Identity::owner("t")).await.unwrap();
        source.load(&Identity::owner("t")).await.unwrap();
        assert_eq!(probe.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_aggregate_respects_ttl() {
        let (source, probe) = source(true, vec![row(&[("id", "1")])], false);
        let snapshot = source.load(&Identity::Aggregate).await.unwrap().unwrap();
        assert_eq!(snapshot.students.len(), 1);
        source.load(&Identity::Aggregate).await.unwrap();
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unavailable_is_none() {
        let (source, _) = source(false, vec![row(&[("id", "1")])], false);
        assert!(source.load(&Identity::owner("t")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_rows_is_none() {
        let (source, _) = source(true, Vec::new(), false);
        assert!(source.load(&Identity::owner("t")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let (source, _) = source(true, Vec::new(), true);
        assert!(source.load(&Identity::owner("t")).await.is_err());
    }
}
