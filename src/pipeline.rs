//! Wiring of the pipeline from configuration
//!
//! One [`AvailabilityMonitor`] is shared by the predictor, the remote data
//! source, and the persistence coordinator so they agree on reachability.

use crate::config::Config;
use crate::errors::{Result, ShieldError};
use crate::persistence::{PersistenceCoordinator, SaveOutcome};
use crate::remote::{AvailabilityMonitor, HealthProbe, HttpRemoteClient, RemoteService, SystemClock};
use crate::schema::manual_entry;
use crate::scoring::Predictor;
use crate::sources::{BundledFileSource, CacheSource, DataSourceResolver, LocalCache, RemoteSource};
use crate::types::{Identity, Origin, PredictionResult, Snapshot, StudentRecord};
use std::sync::Arc;
use tracing::{info, warn};

pub struct Pipeline {
    client: Arc<HttpRemoteClient>,
    monitor: Arc<AvailabilityMonitor>,
    predictor: Predictor,
    resolver: DataSourceResolver,
    coordinator: PersistenceCoordinator,
    cache: Arc<LocalCache>,
}

impl Pipeline {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Arc::new(HttpRemoteClient::with_config(
            &config.remote.base_url,
            config.timeout(),
        )?);
        let probe: Arc<dyn HealthProbe> = client.clone();
        let remote: Arc<dyn RemoteService> = client.clone();

        let monitor = Arc::new(AvailabilityMonitor::with_clock(
            probe,
            Arc::new(SystemClock),
            config.availability_ttl(),
        ));
        let cache = Arc::new(LocalCache::new(config.cache_dir()));
        let known = config.known_identities();

        let resolver = DataSourceResolver::standard(
            BundledFileSource::new(config.snapshot_dir(), known.clone()),
            RemoteSource::new(remote.clone(), monitor.clone()),
            CacheSource::new(cache.clone(), known),
        );

        Ok(Self {
            predictor: Predictor::new(remote.clone(), monitor.clone()),
            coordinator: PersistenceCoordinator::new(remote, monitor.clone(), cache.clone()),
            cache,
            client,
            monitor,
            resolver,
        })
    }

    pub fn client(&self) -> &HttpRemoteClient {
        &self.client
    }

    pub fn monitor(&self) -> &AvailabilityMonitor {
        &self.monitor
    }

    pub async fn predict(&self, records: &[StudentRecord]) -> Vec<PredictionResult> {
        self.predictor.predict(records).await
    }

    pub async fn load(&self, identity: &Identity) -> Snapshot {
        self.resolver.resolve(identity).await
    }

    pub async fn save(&self, owner: &str, students: &[StudentRecord]) -> SaveOutcome {
        self.coordinator.save(owner, students).await
    }

    /// Append one hand-entered student to `owner`'s current set, re-score the
    /// whole set, and save it through both tiers.
    ///
    /// The returned snapshot's origin is the tier now holding the data; after
    /// a failed save it is the origin the set was loaded from.
    pub async fn add_student(&self, owner: &str, entry: StudentRecord) -> Result<(Snapshot, SaveOutcome)> {
        if owner.trim().is_empty() {
            return Err(ShieldError::InvalidInput("owner identity is required".to_string()));
        }

        let current = self.load(&Identity::owner(owner)).await;
        let mut students = current.students;
        let added = manual_entry(&students, entry)?;
        info!(owner, id = added.id.as_str(), "Adding student");
        students.push(added);

        let predictions = self.predict(&students).await;
        let outcome = self.save(owner, &students).await;
        let origin = match outcome {
            SaveOutcome::RemoteSucceeded => Origin::Remote,
            SaveOutcome::LocalOnly => Origin::Cache,
            SaveOutcome::Failed => current.origin,
        };
        Ok((Snapshot::scored(origin, students, predictions), outcome))
    }

    /// Delete one student from the remote store, then from `owner`'s local
    /// cache. Needs a fresh positive availability check.
    ///
    /// Returns how many cached rows were removed.
    pub async fn delete_student(&self, owner: &str, student_id: &str) -> Result<usize> {
        if !self.monitor.check(true).await {
            return Err(ShieldError::Transport(
                "remote predictor is unavailable; deletion needs the remote store".to_string(),
            ));
        }
        self.client.delete_student(owner, student_id).await?;

        let cached = match self.cache.load(owner).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(owner, "Deleted remotely but could not read local cache: {}", e);
                return Ok(0);
            }
        };
        let before = cached.len();
        let kept: Vec<StudentRecord> = cached.into_iter().filter(|s| s.id != student_id).collect();
        let removed = before - kept.len();
        if removed > 0 {
            if let Err(e) = self.cache.store(owner, &kept).await {
                warn!(owner, "Deleted remotely but could not rewrite local cache: {}", e);
                return Ok(0);
            }
        }
        info!(owner, student_id, removed, "Deleted student");
        Ok(removed)
    }
}
