use crate::error::{ResolverError, ResolverErrorExt, Result};
use crate::source::DataSource;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

/// Fetches payloads from `<base_url>/<key>` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("addrmeta/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { client, base_url })
    }
}

impl DataSource for HttpSource {
    #[instrument(skip(self))]
    async fn fetch(&self, key: &str) -> Result<String> {
        let url = format!("{}/{key}", self.base_url);
        let response = self.client.get(&url).send().await.context(url.clone())?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ResolverError::key_unavailable(key)),
            status if !status.is_success() => Err(ResolverError::Transport {
                message: format!("unexpected status {status}").into(),
                context: Some(url.into()),
            }),
            _ => {
                let body = response.text().await.context(url)?;
                debug!(key, bytes = body.len(), "Payload fetched");
                Ok(body)
            },
        }
    }
}
