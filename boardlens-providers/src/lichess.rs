use crate::parse::CloudEvalResponse;
use crate::request::{Body, HttpRequest, join_url};
use boardlens_core::PositionAnalysis;
use url::form_urlencoded;

pub const CLOUD_EVAL_BASE: &str = "https://lichess.org";
pub const EXPLORER_BASE: &str = "https://explorer.lichess.ovh";

const ANALYSIS_BOARD_BASE: &str = "https://lichess.org/analysis";

/// Cloud evaluation lookup. `multiPv` is pinned to 1; the pipeline only
/// ever shows a single line.
pub fn build_cloud_eval_request(base_url: &str, fen: &str) -> HttpRequest {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("fen", fen)
        .append_pair("multiPv", "1")
        .finish();

    HttpRequest {
        method: "GET".into(),
        url: format!("{}?{}", join_url(base_url, "/api/cloud-eval"), query),
        headers: vec![("Accept".into(), "application/json".into())],
        body: Body::Empty,
    }
}

/// Masters-database lookup, used only to name the opening.
pub fn build_opening_request(base_url: &str, fen: &str) -> HttpRequest {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("fen", fen)
        .finish();

    HttpRequest {
        method: "GET".into(),
        url: format!("{}?{}", join_url(base_url, "/masters"), query),
        headers: vec![("Accept".into(), "application/json".into())],
        body: Body::Empty,
    }
}

/// Shareable analysis-board link for a position, FEN carried as a query
/// parameter.
pub fn analysis_board_url(fen: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("fen", fen)
        .finish();
    format!("{}?{}", ANALYSIS_BOARD_BASE, query)
}

/// Shapes a cloud evaluation like an engine reply: first variation only,
/// centipawns scaled to pawns. The cloud reports no win chance and no SAN,
/// and a mate score replaces the numeric evaluation entirely.
pub fn analysis_from_cloud_eval(fen: &str, cloud: &CloudEvalResponse) -> PositionAnalysis {
    let pv = cloud.pvs.first();

    let continuation: Vec<String> = pv
        .map(|p| p.moves.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    let best_move = continuation.first().cloned();
    let mate_in = pv.and_then(|p| p.mate);

    let evaluation = if mate_in.is_some() {
        None
    } else {
        pv.and_then(|p| p.cp).map(|cp| cp as f64 / 100.0)
    };

    PositionAnalysis {
        fen: fen.to_string(),
        evaluation,
        best_move,
        best_move_san: None,
        continuation,
        is_mate: mate_in.is_some(),
        mate_in,
        depth: Some(cloud.depth),
        win_chance: None,
    }
}
