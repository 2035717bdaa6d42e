//! Prioritized fallback over data sources
//!
//! Owner views prefer the bundled snapshot, then the remote store, then the
//! local cache. The aggregate view prefers the remote store, then every
//! bundled snapshot merged, then every local cache merged.

use crate::scoring::predict_local;
use crate::sources::{BundledFileSource, CacheSource, DataSource, RemoteSource};
use crate::types::{Identity, Snapshot};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct DataSourceResolver {
    owner_chain: Vec<Arc<dyn DataSource>>,
    aggregate_chain: Vec<Arc<dyn DataSource>>,
}

impl DataSourceResolver {
    pub fn new(owner_chain: Vec<Arc<dyn DataSource>>, aggregate_chain: Vec<Arc<dyn DataSource>>) -> Self {
        Self {
            owner_chain,
            aggregate_chain,
        }
    }

    /// Standard ordering over the three built-in sources
    pub fn standard(bundled: BundledFileSource, remote: RemoteSource, cache: CacheSource) -> Self {
        let bundled: Arc<dyn DataSource> = Arc::new(bundled);
        let remote: Arc<dyn DataSource> = Arc::new(remote);
        let cache: Arc<dyn DataSource> = Arc::new(cache);
        Self::new(
            vec![bundled.clone(), remote.clone(), cache.clone()],
            vec![remote, bundled, cache],
        )
    }

    fn chain_for(&self, identity: &Identity) -> &[Arc<dyn DataSource>] {
        match identity {
            Identity::Owner(_) => &self.owner_chain,
            Identity::Aggregate => &self.aggregate_chain,
        }
    }

    /// First non-empty snapshot along the chain, scored; empty if none has data
    pub async fn resolve(&self, identity: &Identity) -> Snapshot {
        for source in self.chain_for(identity) {
            match source.load(identity).await {
                Ok(Some(snapshot)) if !snapshot.is_empty() => {
                    info!(
                        %identity,
                        source = source.name(),
                        rows = snapshot.students.len(),
                        "Resolved student data"
                    );
                    return score_if_needed(snapshot);
                }
                Ok(_) => debug!(%identity, source = source.name(), "No data, trying next source"),
                Err(e) if e.is_unavailable() => {
                    warn!(%identity, source = source.name(), "Source unavailable: {}", e)
                }
                Err(e) => error!(%identity, source = source.name(), "Source failed: {}", e),
            }
        }

        info!(%identity, "No source had data");
        Snapshot::empty()
    }
}

fn score_if_needed(mut snapshot: Snapshot) -> Snapshot {
    if snapshot.needs_scoring() {
        snapshot.predictions = predict_local(&snapshot.students);
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Result, ShieldError};
    use crate::types::{Origin, StudentRecord};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Nothing,
        Empty,
        Fail,
        Rows(Origin, usize),
    }

    struct FakeSource {
        label: &'static str,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(label: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                label,
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DataSource for FakeSource {
        fn name(&self) -> &'static str {
            self.label
        }

        async fn load(&self, _identity: &Identity) -> Result<Option<Snapshot>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Nothing => Ok(None),
                Behavior::Empty => Ok(Some(Snapshot::unscored(Origin::Cache, Vec::new()))),
                Behavior::Fail => Err(ShieldError::Transport("connection refused".to_string())),
                Behavior::Rows(origin, n) => Ok(Some(Snapshot::unscored(
                    origin,
                    vec![StudentRecord::default(); n],
                ))),
            }
        }
    }

    fn chain(sources: &[Arc<FakeSource>]) -> Vec<Arc<dyn DataSource>> {
        sources.iter().map(|s| s.clone() as Arc<dyn DataSource>).collect()
    }

    #[tokio::test]
    async fn test_first_non_empty_wins() {
        let a = FakeSource::new("a", Behavior::Nothing);
        let b = FakeSource::new("b", Behavior::Rows(Origin::Remote, 2));
        let c = FakeSource::new("c", Behavior::Rows(Origin::Cache, 5));
        let resolver = DataSourceResolver::new(chain(&[a.clone(), b.clone(), c.clone()]), Vec::new());

        let snapshot = resolver.resolve(&Identity::owner("t")).await;
        assert_eq!(snapshot.origin, Origin::Remote);
        assert_eq!(snapshot.students.len(), 2);
        assert_eq!(snapshot.predictions.len(), 2);
        assert_eq!(c.calls(), 0);
    }

    #[tokio::test]
    async fn test_errors_and_empty_snapshots_fall_through() {
        let a = FakeSource::new("a", Behavior::Fail);
        let b = FakeSource::new("b", Behavior::Empty);
        let c = FakeSource::new("c", Behavior::Rows(Origin::Cache, 3));
        let resolver = DataSourceResolver::new(Vec::new(), chain(&[a.clone(), b.clone(), c]));

        let snapshot = resolver.resolve(&Identity::Aggregate).await;
        assert_eq!(snapshot.origin, Origin::Cache);
        assert_eq!(snapshot.predictions.len(), 3);
        assert_eq!(snapshot.predictions[2].name, "Student 3");
        assert_eq!((a.calls(), b.calls()), (1, 1));
    }

    #[tokio::test]
    async fn test_nothing_anywhere_is_empty() {
        let a = FakeSource::new("a", Behavior::Fail);
        let resolver = DataSourceResolver::new(chain(&[a]), Vec::new());
        assert_eq!(resolver.resolve(&Identity::owner("t")).await, Snapshot::empty());
        assert_eq!(resolver.resolve(&Identity::Aggregate).await, Snapshot::empty());
    }

    #[tokio::test]
    async fn test_identity_selects_chain() {
        let owner_only = FakeSource::new("owner", Behavior::Rows(Origin::BundledFile, 1));
        let aggregate_only = FakeSource::new("aggregate", Behavior::Rows(Origin::Remote, 1));
        let resolver = DataSourceResolver::new(chain(&[owner_only.clone()]), chain(&[aggregate_only.clone()]));

        assert_eq!(resolver.resolve(&Identity::owner("t")).await.origin, Origin::BundledFile);
        assert_eq!(resolver.resolve(&Identity::Aggregate).await.origin, Origin::Remote);
        assert_eq!((owner_only.calls(), aggregate_only.calls()), (1, 1));
    }
}
