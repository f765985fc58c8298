use std::time::Duration;

use boardlens_core::{Fen, SideToMove};
use boardlens_pipeline::{AnalysisClient, ClientError, DetectionClient, ImageInput};
use boardlens_runtime::{HttpAnalysisClient, HttpDetectionClient, LichessCloudClient, opening_name};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn photo() -> ImageInput {
    ImageInput {
        bytes: b"img".to_vec(),
    }
}

#[tokio::test]
async fn detect_maps_a_successful_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/detect/base64"))
        .and(body_partial_json(json!({"image": "aW1n", "turn": "white"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "fen": Fen::STARTPOS,
            "board_fen": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "is_valid": true,
            "error": null,
            "lichess_url": "https://lichess.org/editor/rnbqkbnr"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpDetectionClient::new(server.uri(), TIMEOUT);
    let pos = client.detect(&photo(), SideToMove::White).await.unwrap();

    assert_eq!(pos.fen, Fen::STARTPOS);
    assert_eq!(pos.board_fen, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
    assert!(pos.is_legal);
    assert!(pos.editor_url.is_some());
}

#[tokio::test]
async fn detect_surfaces_service_reported_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/detect/base64"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!({"success": false, "error": "no board found"})))
        .mount(&server)
        .await;

    let client = HttpDetectionClient::new(server.uri(), TIMEOUT);
    let err = client.detect(&photo(), SideToMove::White).await.unwrap_err();

    assert!(matches!(&err, ClientError::Service(msg) if msg.contains("no board found")));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn detect_rejects_empty_images_without_a_request() {
    let server = MockServer::start().await;
    // Nothing mounted: any request would 404 and show up as the wrong error.

    let client = HttpDetectionClient::new(server.uri(), TIMEOUT);
    let err = client
        .detect(&ImageInput { bytes: Vec::new() }, SideToMove::White)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Rejected(_)));
    assert!(!err.is_retryable());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn detect_classifies_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect/base64"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;

    let client = HttpDetectionClient::new(server.uri(), TIMEOUT);
    let err = client.detect(&photo(), SideToMove::White).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(_)));

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect/base64"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = HttpDetectionClient::new(server.uri(), TIMEOUT);
    let err = client.detect(&photo(), SideToMove::White).await.unwrap_err();
    assert!(matches!(err, ClientError::Service(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn detect_treats_garbage_bodies_as_service_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect/base64"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "text/plain"))
        .mount(&server)
        .await;

    let client = HttpDetectionClient::new(server.uri(), TIMEOUT);
    let err = client.detect(&photo(), SideToMove::White).await.unwrap_err();
    assert!(matches!(err, ClientError::Service(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn detect_times_out_as_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect/base64"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = HttpDetectionClient::new(server.uri(), Duration::from_millis(200));
    let err = client.detect(&photo(), SideToMove::White).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn analyze_forwards_fen_and_depth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_partial_json(json!({"fen": Fen::STARTPOS, "depth": 12})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fen": Fen::STARTPOS,
            "evaluation": 0.3,
            "best_move": "e2e4",
            "best_move_san": "e4",
            "continuation": ["e2e4", "e7e5", "g1f3"],
            "is_mate": false,
            "mate_in": null,
            "depth": 12,
            "win_chance": 53.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpAnalysisClient::new(server.uri(), TIMEOUT);
    let analysis = client.analyze(Fen::STARTPOS, 12).await.unwrap();

    assert_eq!(analysis.evaluation, Some(0.3));
    assert_eq!(analysis.best_move_san.as_deref(), Some("e4"));
    assert_eq!(analysis.depth, Some(12));
    assert_eq!(analysis.win_chance, Some(53.0));
}

#[tokio::test]
async fn health_probe_reports_reachability() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = HttpAnalysisClient::new(server.uri(), TIMEOUT);
    assert!(client.healthy().await);

    // A server without the endpoint answers 404, which is not healthy.
    let bare = MockServer::start().await;
    let client = HttpDetectionClient::new(bare.uri(), TIMEOUT);
    assert!(!client.healthy().await);
}

#[tokio::test]
async fn cloud_eval_maps_known_positions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cloud-eval"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fen": Fen::STARTPOS,
            "knodes": 13683,
            "depth": 22,
            "pvs": [{"moves": "e2e4 e7e5 g1f3", "cp": 15}]
        })))
        .mount(&server)
        .await;

    let client = LichessCloudClient::with_base_url(server.uri(), TIMEOUT);
    let analysis = client.analyze(Fen::STARTPOS, 12).await.unwrap();

    assert_eq!(analysis.evaluation, Some(0.15));
    assert_eq!(analysis.best_move.as_deref(), Some("e2e4"));
    assert_eq!(analysis.depth, Some(22));
}

#[tokio::test]
async fn cloud_eval_unknown_position_is_empty_not_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cloud-eval"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "Position not found"})),
        )
        .mount(&server)
        .await;

    let client = LichessCloudClient::with_base_url(server.uri(), TIMEOUT);
    let fen = "4k3/8/8/8/8/8/8/4K3 w - - 40 80";
    let analysis = client.analyze(fen, 12).await.unwrap();

    assert_eq!(analysis.fen, fen);
    assert_eq!(analysis.evaluation, None);
    assert!(analysis.continuation.is_empty());
    assert!(!analysis.is_mate);
}

#[tokio::test]
async fn opening_lookup_degrades_to_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/masters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "opening": {"eco": "B20", "name": "Sicilian Defense"},
            "white": 100, "draws": 50, "black": 80
        })))
        .mount(&server)
        .await;

    let name = opening_name(&server.uri(), "some fen", TIMEOUT).await;
    assert_eq!(name.as_deref(), Some("Sicilian Defense"));

    // Unreachable explorer is just an unknown opening.
    let name = opening_name("http://127.0.0.1:1", "some fen", Duration::from_millis(200)).await;
    assert_eq!(name, None);
}
