use std::time::Duration;

use async_trait::async_trait;
use boardlens_core::PositionAnalysis;
use boardlens_pipeline::{AnalysisClient, ClientError};
use boardlens_providers::{
    CLOUD_EVAL_BASE, analysis_from_cloud_eval, build_cloud_eval_request, build_opening_request,
    execute, parse_cloud_eval, parse_opening_name,
};

use crate::http::{check_status, from_transport};

/// Analysis backend that looks positions up in the public cloud-evaluation
/// database instead of running an engine. Depth is whatever the cloud has.
#[derive(Debug, Clone)]
pub struct LichessCloudClient {
    base_url: String,
    timeout: Duration,
}

impl LichessCloudClient {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(CLOUD_EVAL_BASE, timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl AnalysisClient for LichessCloudClient {
    async fn analyze(&self, fen: &str, _depth: u32) -> Result<PositionAnalysis, ClientError> {
        let req = build_cloud_eval_request(&self.base_url, fen);
        let resp = execute(&req, self.timeout).await.map_err(from_transport)?;

        // The cloud answers 404 for positions it has never evaluated.
        // That is an empty result, not a failure.
        if resp.status == 404 {
            return Ok(PositionAnalysis::unevaluated(fen));
        }
        check_status(resp.status)?;

        let cloud =
            parse_cloud_eval(&resp.body).map_err(|e| ClientError::Service(e.to_string()))?;
        Ok(analysis_from_cloud_eval(fen, &cloud))
    }
}

/// Best-effort opening lookup in the masters database. Every failure mode
/// collapses to "unknown opening".
pub async fn opening_name(explorer_base: &str, fen: &str, timeout: Duration) -> Option<String> {
    let req = build_opening_request(explorer_base, fen);
    let resp = match execute(&req, timeout).await {
        Ok(resp) => resp,
        Err(err) => {
            log::warn!("opening lookup failed: {err}");
            return None;
        }
    };
    if !(200..=299).contains(&resp.status) {
        log::warn!("opening lookup answered {}", resp.status);
        return None;
    }
    parse_opening_name(&resp.body).ok().flatten()
}
