//! Cached reachability of the remote predictor
//!
//! The cached result is re-validated asymmetrically: while the service is
//! down every check probes again, while it is up a probe only happens once
//! the TTL has elapsed (or when forced). Concurrent callers share one probe.

use crate::remote::service::HealthProbe;
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Default re-validation window while the service is up
pub const DEFAULT_TTL_SECS: i64 = 10;

/// Source of "now" for TTL decisions
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic tests and replays
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Last known reachability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailabilityState {
    pub available: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
}

/// TTL-cached availability of the remote predictor
pub struct AvailabilityMonitor {
    probe: Arc<dyn HealthProbe>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: tokio::sync::Mutex<AvailabilityState>,
    /// Bumped after every completed probe
    probes_completed: AtomicU64,
}

impl AvailabilityMonitor {
    /// Monitor using the wall clock and the default TTL
    pub fn new(probe: Arc<dyn HealthProbe>) -> Self {
        Self::with_clock(probe, Arc::new(SystemClock), Duration::seconds(DEFAULT_TTL_SECS))
    }

    pub fn with_clock(probe: Arc<dyn HealthProbe>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            probe,
            clock,
            ttl,
            state: tokio::sync::Mutex::new(AvailabilityState::default()),
            probes_completed: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current cached state, without probing
    pub async fn peek(&self) -> AvailabilityState {
        *self.state.lock().await
    }

    fn needs_probe(&self, state: &AvailabilityState, force: bool) -> bool {
        match state.last_checked_at {
            None => true,
            Some(_) if force || !state.available => true,
            Some(checked_at) => self.clock.now() - checked_at > self.ttl,
        }
    }

    /// Whether the remote predictor is reachable, probing when the cache says so
    pub async fn check(&self, force: bool) -> bool {
        let seen = self.probes_completed.load(Ordering::Acquire);
        let mut state = self.state.lock().await;

        if self.probes_completed.load(Ordering::Acquire) != seen {
            // another caller probed while we waited for the lock
            return state.available;
        }
        if !self.needs_probe(&state, force) {
            return state.available;
        }

        let started_at = self.clock.now();
        let available = self.probe.probe().await;
        let previous = *state;
        *state = AvailabilityState {
            available,
            last_checked_at: Some(started_at),
        };
        self.probes_completed.fetch_add(1, Ordering::AcqRel);

        match (previous.last_checked_at.is_some(), previous.available, available) {
            (true, false, true) => info!("Remote predictor is back online"),
            (_, true, false) => warn!("Remote predictor became unreachable"),
            (false, _, _) => debug!(available, "Initial remote availability check"),
            _ => {}
        }

        available
    }

    /// Number of probes performed so far
    pub fn probe_count(&self) -> u64 {
        self.probes_completed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;

    /// Replays scripted probe results, then repeats the last one
    struct ScriptedProbe {
        results: Mutex<VecDeque<bool>>,
        last: Mutex<bool>,
        calls: AtomicUsize,
        delay: std::time::Duration,
    }

    impl ScriptedProbe {
        fn new(results: &[bool]) -> Arc<Self> {
            Self::with_delay(results, std::time::Duration::ZERO)
        }

        fn with_delay(results: &[bool], delay: std::time::Duration) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(results.iter().copied().collect()),
                last: Mutex::new(false),
                calls: AtomicUsize::new(0),
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HealthProbe for ScriptedProbe {
        async fn probe(&self) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let next = self.results.lock().unwrap().pop_front();
            let mut last = self.last.lock().unwrap();
            if let Some(value) = next {
                *last = value;
            }
            *last
        }
    }

    fn monitor(probe: Arc<ScriptedProbe>) -> (AvailabilityMonitor, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let monitor = AvailabilityMonitor::with_clock(probe, clock.clone(), Duration::seconds(10));
        (monitor, clock)
    }

    #[tokio::test]
    async fn test_first_check_probes() {
        let probe = ScriptedProbe::new(&[true]);
        let (monitor, _clock) = monitor(probe.clone());
        assert_eq!(monitor.peek().await, AvailabilityState::default());
        assert!(monitor.check(false).await);
        assert_eq!(probe.calls(), 1);
        assert!(monitor.peek().await.last_checked_at.is_some());
    }

    #[tokio::test]
    async fn test_available_is_cached_within_ttl() {
        let probe = ScriptedProbe::new(&[true]);
        let (monitor, clock) = monitor(probe.clone());
        assert!(monitor.check(false).await);
        clock.advance(Duration::seconds(5));
        assert!(monitor.check(false).await);
        clock.advance(Duration::seconds(5));
        // exactly at the TTL is still fresh
        assert!(monitor.check(false).await);
        assert_eq!(probe.calls(), 1);

        clock.advance(Duration::milliseconds(1));
        assert!(monitor.check(false).await);
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test]
    async fn test_force_bypasses_ttl() {
        let probe = ScriptedProbe::new(&[true, false]);
        let (monitor, _clock) = monitor(probe.clone());
        assert!(monitor.check(false).await);
        assert!(!monitor.check(true).await);
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_reprobes_within_ttl() {
        let probe = ScriptedProbe::new(&[false, true]);
        let (monitor, clock) = monitor(probe.clone());
        assert!(!monitor.check(false).await);

        clock.advance(Duration::seconds(1));
        assert!(monitor.check(false).await);
        assert_eq!(probe.calls(), 2);
        assert!(monitor.peek().await.available);
    }

    #[tokio::test]
    async fn test_concurrent_checks_share_one_probe() {
        let probe = ScriptedProbe::with_delay(&[true], std::time::Duration::from_millis(50));
        let (monitor, _clock) = monitor(probe.clone());

        let results = futures_util::future::join_all((0..5).map(|_| monitor.check(false))).await;
        assert!(results.into_iter().all(|available| available));
        assert_eq!(probe.calls(), 1);
        assert_eq!(monitor.probe_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_checks_while_down_share_one_probe() {
        let probe = ScriptedProbe::with_delay(&[false], std::time::Duration::from_millis(50));
        let (monitor, _clock) = monitor(probe.clone());

        let results = futures_util::future::join_all((0..3).map(|_| monitor.check(false))).await;
        assert!(results.into_iter().all(|available| !available));
        assert_eq!(probe.calls(), 1);
    }
}
