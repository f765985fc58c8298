use anyhow::Context;
use boardlens_core::PositionAnalysis;
use serde::Deserialize;

/// Detection service reply. Failure replies carry only `success` and
/// `error`, so everything else defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectResponse {
    pub success: bool,
    #[serde(default)]
    pub fen: Option<String>,
    #[serde(default)]
    pub board_fen: Option<String>,
    #[serde(default = "default_is_valid")]
    pub is_valid: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub lichess_url: Option<String>,
}

fn default_is_valid() -> bool {
    true
}

pub fn parse_detect_response(body: &[u8]) -> anyhow::Result<DetectResponse> {
    serde_json::from_slice(body).context("decode detection JSON")
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    fen: String,
    evaluation: Option<f64>,
    best_move: Option<String>,
    best_move_san: Option<String>,
    continuation: Vec<String>,
    is_mate: bool,
    mate_in: Option<i32>,
    depth: u32,
    win_chance: Option<f64>,
}

pub fn parse_analyze_response(body: &[u8]) -> anyhow::Result<PositionAnalysis> {
    let resp: AnalyzeResponse = serde_json::from_slice(body).context("decode analysis JSON")?;
    Ok(PositionAnalysis {
        fen: resp.fen,
        evaluation: resp.evaluation,
        best_move: resp.best_move,
        best_move_san: resp.best_move_san,
        continuation: resp.continuation,
        is_mate: resp.is_mate,
        mate_in: resp.mate_in,
        depth: Some(resp.depth),
        win_chance: resp.win_chance,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudEvalResponse {
    pub depth: u32,
    #[serde(default)]
    pub pvs: Vec<CloudPv>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudPv {
    pub moves: String,
    #[serde(default)]
    pub cp: Option<i64>,
    #[serde(default)]
    pub mate: Option<i32>,
}

pub fn parse_cloud_eval(body: &[u8]) -> anyhow::Result<CloudEvalResponse> {
    serde_json::from_slice(body).context("decode cloud eval JSON")
}

#[derive(Debug, Deserialize)]
struct OpeningResponse {
    opening: Option<OpeningEntry>,
}

#[derive(Debug, Deserialize)]
struct OpeningEntry {
    name: String,
}

/// Opening lookup reply; positions past theory legitimately have none.
pub fn parse_opening_name(body: &[u8]) -> anyhow::Result<Option<String>> {
    let resp: OpeningResponse = serde_json::from_slice(body).context("decode opening JSON")?;
    Ok(resp.opening.map(|o| o.name))
}
