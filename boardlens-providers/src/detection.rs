use crate::request::{Body, HttpRequest, join_url};
use base64::Engine;
use boardlens_core::SideToMove;
use serde_json::json;

/// Builds the board-detection call. The service takes the photograph as a
/// base64 string so the request stays a single JSON document; the multipart
/// upload route exists server-side but this client never uses it.
pub fn build_detect_request(
    base_url: &str,
    image_bytes: &[u8],
    side_to_move: SideToMove,
) -> HttpRequest {
    let b64 = base64::engine::general_purpose::STANDARD.encode(image_bytes);

    let payload = json!({
        "image": b64,
        "turn": side_to_move.as_str(),
    });

    HttpRequest {
        method: "POST".into(),
        url: join_url(base_url, "/detect/base64"),
        headers: vec![("Content-Type".into(), "application/json".into())],
        body: Body::Json(payload.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_json_detect_request() {
        let req = build_detect_request("http://localhost:8001", b"img", SideToMove::White);

        assert_eq!(req.method, "POST");
        assert_eq!(req.url, "http://localhost:8001/detect/base64");
        assert_eq!(req.header("content-type"), Some("application/json"));
        match &req.body {
            Body::Json(s) => {
                let v: serde_json::Value = serde_json::from_str(s).unwrap();
                assert_eq!(v["image"], "aW1n");
                assert_eq!(v["turn"], "white");
            }
            other => panic!("expected json body, got {other:?}"),
        }
    }

    #[test]
    fn encodes_side_to_move_lowercase() {
        let req = build_detect_request("http://localhost:8001", b"img", SideToMove::Black);
        match &req.body {
            Body::Json(s) => assert!(s.contains("\"turn\":\"black\"")),
            other => panic!("expected json body, got {other:?}"),
        }
    }
}
