use std::time::Duration;

use async_trait::async_trait;
use boardlens_core::{DetectedPosition, SideToMove};
use boardlens_pipeline::{ClientError, DetectionClient, ImageInput};
use boardlens_providers::{build_detect_request, execute, parse_detect_response};

use crate::http::{check_status, from_transport, probe};

/// Board detection backed by the vision service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpDetectionClient {
    base_url: String,
    timeout: Duration,
}

impl HttpDetectionClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl DetectionClient for HttpDetectionClient {
    async fn detect(
        &self,
        image: &ImageInput,
        side_to_move: SideToMove,
    ) -> Result<DetectedPosition, ClientError> {
        // Checked here, before any network traffic: an empty capture can
        // never succeed and retrying it is pointless.
        if image.bytes.is_empty() {
            return Err(ClientError::Rejected("image is empty".into()));
        }

        let req = build_detect_request(&self.base_url, &image.bytes, side_to_move);
        let resp = execute(&req, self.timeout).await.map_err(from_transport)?;
        check_status(resp.status)?;

        let parsed =
            parse_detect_response(&resp.body).map_err(|e| ClientError::Service(e.to_string()))?;

        if !parsed.success {
            return Err(ClientError::Service(
                parsed.error.unwrap_or_else(|| "detection failed".into()),
            ));
        }

        let fen = parsed
            .fen
            .ok_or_else(|| ClientError::Service("detection reply carried no notation".into()))?;
        let board_fen = parsed
            .board_fen
            .unwrap_or_else(|| fen.split_whitespace().next().unwrap_or_default().to_string());

        Ok(DetectedPosition {
            board_fen,
            is_legal: parsed.is_valid,
            editor_url: parsed.lichess_url,
            fen,
        })
    }

    async fn healthy(&self) -> bool {
        probe(&self.base_url, self.timeout).await
    }
}
