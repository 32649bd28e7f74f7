//! HTTP plumbing behind a small client trait, so shape retrieval can be
//! swapped out in tests.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: reqwest::Request) -> Result<reqwest::Response>;
}

/// Plain reqwest-backed client with bounded waits.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> Result<reqwest::Response> {
        Ok(self.0.execute(req).await?)
    }
}

/// Issues a GET with the given Accept header and returns the parsed JSON
/// body, failing on non-success statuses.
pub async fn fetch_json<C: HttpClient>(
    client: &C,
    url: &str,
    accept: &str,
) -> Result<serde_json::Value> {
    let mut req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);
    req.headers_mut().insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_str(accept)?,
    );

    let resp = client.execute(req).await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("request failed with status {status}: {body}");
    }

    Ok(resp.json().await?)
}
