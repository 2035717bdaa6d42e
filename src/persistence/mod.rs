//! Dual-tier persistence: remote store when reachable, local cache always

pub mod coordinator;

pub use coordinator::{PersistenceCoordinator, SaveOutcome};
