//! Name resolver. Scrapes the public mobile profile page per owner id and
//! maps ids to `"{id} ({Display Name})"` folder labels.
//!
//! Best effort and fully optional: any failure just leaves the id
//! unresolved, and the planner falls back to the decimal id. Runs under its
//! own semaphore so its fan-out is decoupled from the download engine's.

use crate::domain::DomainError;
use crate::ports::NameResolverPort;
use regex::Regex;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

const PROFILE_URL_BASE: &str = "https://m.vk.com/id";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Simultaneous profile lookups.
const LOOKUP_CONCURRENCY: usize = 10;

/// Resolver against the public VK mobile pages.
pub struct VkNameResolver {
    inner: Arc<Inner>,
}

struct Inner {
    client: Client,
    title_re: Regex,
    semaphore: Semaphore,
}

impl VkNameResolver {
    pub fn new() -> Self {
        // same failure mode as reqwest::Client::new(): TLS backend init
        let client = Client::builder()
            .user_agent(super::fetcher::USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client");
        Self {
            inner: Arc::new(Inner {
                client,
                title_re: Regex::new(r"<title>(.*?)</title>").expect("static regex"),
                semaphore: Semaphore::new(LOOKUP_CONCURRENCY),
            }),
        }
    }
}

impl Default for VkNameResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    async fn lookup(&self, id: i64) -> Result<String, DomainError> {
        let url = format!("{}{}", PROFILE_URL_BASE, id);
        let html = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::Resolve(e.to_string()))?
            .text()
            .await
            .map_err(|e| DomainError::Resolve(e.to_string()))?;

        let captures = self
            .title_re
            .captures(&html)
            .ok_or_else(|| DomainError::Resolve(format!("no title on profile page for {}", id)))?;
        display_name(id, &captures[1]).ok_or_else(|| {
            DomainError::Resolve(format!("profile page for {} has a generic title", id))
        })
    }
}

/// Turn a raw page title into a folder label, or `None` when the title
/// carries no real name. Page titles look like `"Name Surname | VK"`; a bare
/// site name means the profile is hidden or deleted.
fn display_name(id: i64, raw_title: &str) -> Option<String> {
    let title = raw_title.split('|').next().unwrap_or("").trim();
    if title.is_empty() || title.eq_ignore_ascii_case("vk") || title == "ВКонтакте" {
        return None;
    }
    Some(format!("{} ({})", id, title))
}

/// Collect lookup results, tolerating lost tasks: one failed join must not
/// discard the rest of the map.
async fn drain_lookups(
    mut set: JoinSet<(i64, Result<String, DomainError>)>,
) -> HashMap<i64, String> {
    let mut names = HashMap::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((id, Ok(name))) => {
                names.insert(id, name);
            }
            Ok((id, Err(e))) => debug!(id, error = %e, "name unresolved, using numeric id"),
            Err(e) => debug!(error = %e, "name lookup task lost"),
        }
    }
    names
}

#[async_trait::async_trait]
impl NameResolverPort for VkNameResolver {
    async fn resolve(&self, ids: &HashSet<i64>) -> HashMap<i64, String> {
        if ids.is_empty() {
            return HashMap::new();
        }
        info!(count = ids.len(), "resolving owner display names");

        let mut set = JoinSet::new();
        for &id in ids {
            let inner = Arc::clone(&self.inner);
            set.spawn(async move {
                let _permit = inner.semaphore.acquire().await.expect("semaphore closed");
                (id, inner.lookup(id).await)
            });
        }
        drain_lookups(set).await
    }
}
