use pulsemap::estimate::{self, EstimateBackend, EstimateRequest, EstimateResponse};
use reqwest::{Client, header::CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

/// Posts estimate requests as JSON to the dashboard backend.
#[derive(Debug, Clone)]
pub struct HttpEstimateBackend {
    client: Client,
    url: String,
}

impl HttpEstimateBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl EstimateBackend for HttpEstimateBackend {
    async fn estimate(&self, request: &EstimateRequest) -> Result<i32, estimate::Error> {
        let body = serde_json::to_vec(request)
            .map_err(|err| estimate::Error::InvalidResponse(err.to_string()))?;
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| estimate::Error::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(estimate::Error::Status(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| estimate::Error::Transport(err.to_string()))?;
        let reply: EstimateResponse = serde_json::from_slice(&bytes)
            .map_err(|err| estimate::Error::InvalidResponse(err.to_string()))?;
        debug!("Estimate for {}: {}", request.node_id, reply.value);
        reply.load()
    }
}
