use std::time::Duration;

use async_trait::async_trait;
use boardlens_core::PositionAnalysis;
use boardlens_pipeline::{AnalysisClient, ClientError};
use boardlens_providers::{build_analyze_request, execute, parse_analyze_response};

use crate::http::{check_status, from_transport, probe};

/// Engine analysis backed by the evaluation service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    base_url: String,
    timeout: Duration,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, fen: &str, depth: u32) -> Result<PositionAnalysis, ClientError> {
        let req = build_analyze_request(&self.base_url, fen, depth);
        let resp = execute(&req, self.timeout).await.map_err(from_transport)?;
        check_status(resp.status)?;

        parse_analyze_response(&resp.body).map_err(|e| ClientError::Service(e.to_string()))
    }

    async fn healthy(&self) -> bool {
        probe(&self.base_url, self.timeout).await
    }
}
