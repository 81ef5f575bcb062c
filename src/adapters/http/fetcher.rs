//! Implements FetchPort with reqwest. One shared client, browser-like UA.

use crate::domain::DomainError;
use crate::ports::FetchPort;
use reqwest::Client;
use std::time::Duration;

/// Photo hosts occasionally reject unknown clients, so present a plain
/// desktop browser.
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/84.0.4147.135 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP fetcher backed by a shared reqwest client.
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        // same failure mode as reqwest::Client::new(): TLS backend init
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client");
        Self { client }
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FetchPort for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::Transport(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}
