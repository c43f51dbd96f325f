use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::{ClientError, PrinterApi, PrinterJob, PrinterStatus, Result, StatusResponse};

const STATUS_PATH: &str = "/api/v1/status";
const JOB_PATH: &str = "/api/v1/job";

pub struct PrusaLinkClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl PrusaLinkClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key: api_key.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, endpoint: &'static str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let resp = self.client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = resp.status();
        debug!(endpoint, status = status.as_u16(), "prusalink: response");
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint,
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl PrinterApi for PrusaLinkClient {
    async fn fetch_status(&self) -> Result<PrinterStatus> {
        let bytes = self.get(STATUS_PATH).await?.bytes().await?;
        let body: StatusResponse = serde_json::from_slice(&bytes)?;
        Ok(body.printer)
    }

    async fn fetch_job(&self) -> Result<Option<PrinterJob>> {
        let resp = self.get(JOB_PATH).await?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let bytes = resp.bytes().await?;
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
