use async_trait::async_trait;
use boardlens_core::{DetectedPosition, PositionAnalysis, SideToMove};
use thiserror::Error;

/// A captured photograph of a physical board. The pipeline treats the
/// bytes as opaque; decoding happens on the detection service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
}

/// Failure of a boundary call, classified for retry decisions. Clients
/// never retry on their own; retries happen only on explicit user action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The request itself was unacceptable. Retrying the same input is pointless.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The service answered but could not produce a result.
    #[error("service failure: {0}")]
    Service(String),

    #[error("request timed out")]
    Timeout,

    #[error("network failure: {0}")]
    Network(String),
}

impl ClientError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ClientError::Rejected(_))
    }
}

#[async_trait]
pub trait DetectionClient: Send + Sync {
    async fn detect(
        &self,
        image: &ImageInput,
        side_to_move: SideToMove,
    ) -> Result<DetectedPosition, ClientError>;

    /// Cheap reachability probe; defaults to optimistic for backends
    /// without one.
    async fn healthy(&self) -> bool {
        true
    }
}

#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, fen: &str, depth: u32) -> Result<PositionAnalysis, ClientError>;

    async fn healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rejections_are_final() {
        assert!(!ClientError::Rejected("empty image".into()).is_retryable());
        assert!(ClientError::Service("engine crashed".into()).is_retryable());
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::Network("connection refused".into()).is_retryable());
    }
}
