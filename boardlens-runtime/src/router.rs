use std::sync::Arc;

use boardlens_pipeline::AnalysisClient;

/// Picks the analysis backend by its config name.
///
/// Supported backends:
/// - "engine" -> local evaluation service
/// - "lichess" -> public cloud-evaluation lookup
#[derive(Clone)]
pub struct AnalysisRouter {
    engine: Option<Arc<dyn AnalysisClient>>,
    lichess: Option<Arc<dyn AnalysisClient>>,
}

impl AnalysisRouter {
    pub fn new() -> Self {
        Self {
            engine: None,
            lichess: None,
        }
    }

    pub fn with_engine(mut self, client: Arc<dyn AnalysisClient>) -> Self {
        self.engine = Some(client);
        self
    }

    pub fn with_lichess(mut self, client: Arc<dyn AnalysisClient>) -> Self {
        self.lichess = Some(client);
        self
    }

    pub fn select(&self, backend: &str) -> anyhow::Result<Arc<dyn AnalysisClient>> {
        match backend {
            "engine" => self
                .engine
                .clone()
                .ok_or_else(|| anyhow::anyhow!("engine analysis backend not configured")),
            "lichess" => self
                .lichess
                .clone()
                .ok_or_else(|| anyhow::anyhow!("lichess analysis backend not configured")),
            other => Err(anyhow::anyhow!("unsupported analysis backend: {other}")),
        }
    }
}
