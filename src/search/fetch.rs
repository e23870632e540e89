//! HTTP GET boundary shared by the search resolvers.

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;

use super::SearchError;

/// User agent sent with every search request.
pub const USER_AGENT: &str = "LocalCodeAgent/1.0";

/// Fetch a URL and return the response body as text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, SearchError>;
}

/// reqwest-backed fetcher with a bounded timeout.
///
/// When `insecure_tls_retry` is enabled, a request that fails certificate
/// verification is retried exactly once with verification turned off. This
/// is off by default and should stay off anywhere the network is not trusted.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    timeout: Duration,
    insecure_tls_retry: bool,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, insecure_tls_retry: bool) -> Self {
        Self {
            timeout,
            insecure_tls_retry,
        }
    }

    fn client(&self, accept_invalid_certs: bool) -> Result<reqwest::Client, SearchError> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(SearchError::Client)
    }

    async fn get(&self, client: &reqwest::Client, url: &str) -> Result<String, SearchError> {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|source| SearchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| SearchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, SearchError> {
        let first = self.get(&self.client(false)?, url).await;
        match first {
            Err(SearchError::Transport { ref source, .. })
                if self.insecure_tls_retry && is_certificate_error(source) =>
            {
                tracing::warn!(
                    url = %url,
                    "TLS certificate verification failed, retrying without verification"
                );
                self.get(&self.client(true)?, url).await
            }
            other => other,
        }
    }
}

/// Whether any error in the source chain reports a certificate problem.
pub(crate) fn is_certificate_error(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let message = e.to_string().to_lowercase();
        if message.contains("certificate") || message.contains("unknownissuer") {
            return true;
        }
        current = e.source();
    }
    false
}
