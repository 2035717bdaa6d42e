//! Data sources and the prioritized resolver over them
//!
//! Each origin (bundled CSV snapshots, the remote predictor, the local
//! cache) implements [`DataSource`]. The [`DataSourceResolver`] walks an
//! ordered chain per identity kind and returns the first non-empty snapshot.

pub mod bundled;
pub mod cache;
pub mod remote;
pub mod resolver;

use crate::errors::Result;
use crate::types::{Identity, Snapshot};
use async_trait::async_trait;

pub use bundled::BundledFileSource;
pub use cache::{CacheSource, LocalCache, CACHE_FILE_PREFIX};
pub use remote::RemoteSource;
pub use resolver::DataSourceResolver;

/// One origin of student rows
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    /// `Ok(None)` or an empty snapshot means "nothing here, try the next source"
    async fn load(&self, identity: &Identity) -> Result<Option<Snapshot>>;
}

/// Map an identity onto a file name component
///
/// ASCII letters, digits and `-` pass through. Every other byte, `_`
/// included, becomes `_` plus two hex digits, so distinct identities never
/// share a file. The empty identity maps to a bare `_`.
pub fn file_safe(identity: &str) -> String {
    if identity.is_empty() {
        return "_".to_string();
    }
    let mut encoded = String::with_capacity(identity.len());
    for byte in identity.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("_{:02X}", byte));
        }
    }
    encoded
}
