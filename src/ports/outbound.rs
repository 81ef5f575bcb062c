//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::DomainError;
use std::collections::{HashMap, HashSet};

/// Raw byte fetch over the network. The download engine retries through this.
#[async_trait::async_trait]
pub trait FetchPort: Send + Sync {
    /// GET `url` and return the full response body.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError>;
}

/// Optional lookup of human-readable display names for owner ids.
///
/// Best effort: ids that cannot be resolved are simply absent from the
/// returned map and callers fall back to the decimal id.
#[async_trait::async_trait]
pub trait NameResolverPort: Send + Sync {
    async fn resolve(&self, ids: &HashSet<i64>) -> HashMap<i64, String>;
}
