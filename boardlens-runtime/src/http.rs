use std::time::Duration;

use boardlens_pipeline::ClientError;
use boardlens_providers::{TransportError, build_health_request, execute};

pub(crate) fn from_transport(err: TransportError) -> ClientError {
    match err {
        TransportError::Timeout => ClientError::Timeout,
        TransportError::Transport(msg) => ClientError::Network(msg),
        TransportError::InvalidRequest(msg) => ClientError::Rejected(msg),
    }
}

// 4xx means the request itself was bad; 5xx means the service buckled.
pub(crate) fn check_status(status: u16) -> Result<(), ClientError> {
    if (200..=299).contains(&status) {
        return Ok(());
    }
    if (400..=499).contains(&status) {
        Err(ClientError::Rejected(format!("status {status}")))
    } else {
        Err(ClientError::Service(format!("status {status}")))
    }
}

pub(crate) async fn probe(base_url: &str, timeout: Duration) -> bool {
    let req = build_health_request(base_url);
    match execute(&req, timeout).await {
        Ok(resp) => (200..=299).contains(&resp.status),
        Err(err) => {
            log::debug!("health probe failed for {base_url}: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(check_status(200).is_ok());
        assert!(check_status(204).is_ok());
        assert!(matches!(check_status(404), Err(ClientError::Rejected(_))));
        assert!(matches!(check_status(422), Err(ClientError::Rejected(_))));
        assert!(matches!(check_status(500), Err(ClientError::Service(_))));
        assert!(matches!(check_status(503), Err(ClientError::Service(_))));
    }

    #[test]
    fn transport_errors_map_to_retryability() {
        assert!(from_transport(TransportError::Timeout).is_retryable());
        assert!(from_transport(TransportError::Transport("refused".into())).is_retryable());
        assert!(!from_transport(TransportError::InvalidRequest("bad header".into())).is_retryable());
    }
}
