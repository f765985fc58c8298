use crate::request::{Body, HttpRequest, join_url};
use serde_json::json;

pub fn build_analyze_request(base_url: &str, fen: &str, depth: u32) -> HttpRequest {
    let payload = json!({
        "fen": fen,
        "depth": depth,
    });

    HttpRequest {
        method: "POST".into(),
        url: join_url(base_url, "/analyze"),
        headers: vec![("Content-Type".into(), "application/json".into())],
        body: Body::Json(payload.to_string()),
    }
}
