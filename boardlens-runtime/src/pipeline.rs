use std::sync::Arc;
use std::time::Duration;

use boardlens_core::config::AppConfig;
use boardlens_pipeline::{AnalysisClient, ControllerConfig, DetectionClient, PositionController};

use crate::analysis::HttpAnalysisClient;
use crate::detection::HttpDetectionClient;
use crate::lichess::LichessCloudClient;
use crate::router::AnalysisRouter;

/// Build a runnable controller from config.
///
/// This keeps the presentation layer thin: it hands over a photograph or a
/// typed position and watches snapshots.
pub fn build_controller_from_config(cfg: &AppConfig) -> anyhow::Result<PositionController> {
    let timeout = Duration::from_secs(cfg.request_timeout_secs);

    let detection: Arc<dyn DetectionClient> =
        Arc::new(HttpDetectionClient::new(&cfg.detection_endpoint, timeout));

    let router = AnalysisRouter::new()
        .with_engine(Arc::new(HttpAnalysisClient::new(
            &cfg.analysis_endpoint,
            timeout,
        )))
        .with_lichess(Arc::new(LichessCloudClient::new(timeout)));
    let analysis = router.select(&cfg.analysis_backend)?;

    Ok(PositionController::new(
        detection,
        analysis,
        ControllerConfig {
            analysis_depth: cfg.analysis_depth,
        },
    ))
}

#[derive(Debug, Clone, Copy)]
pub struct ServiceHealth {
    pub detection: bool,
    pub analysis: bool,
}

/// One-shot reachability check for startup diagnostics. The cloud backend
/// has no probe endpoint and reports healthy.
pub async fn probe_services(cfg: &AppConfig) -> ServiceHealth {
    let timeout = Duration::from_secs(cfg.request_timeout_secs);

    let detection = HttpDetectionClient::new(&cfg.detection_endpoint, timeout)
        .healthy()
        .await;

    let analysis = match cfg.analysis_backend.as_str() {
        "lichess" => LichessCloudClient::new(timeout).healthy().await,
        _ => {
            HttpAnalysisClient::new(&cfg.analysis_endpoint, timeout)
                .healthy()
                .await
        }
    };

    ServiceHealth {
        detection,
        analysis,
    }
}
