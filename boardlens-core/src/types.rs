use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideToMove {
    White,
    Black,
}

impl SideToMove {
    pub fn as_str(&self) -> &'static str {
        match self {
            SideToMove::White => "white",
            SideToMove::Black => "black",
        }
    }
}

/// Position reported by the board-detection service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedPosition {
    pub fen: String,

    // Piece placement only (first FEN field), useful for editor links.
    pub board_fen: String,

    // The service's own legality verdict for the detected placement.
    // A detected-but-illegal position is still usable; callers surface it as a warning.
    pub is_legal: bool,

    pub editor_url: Option<String>,
}

/// Engine verdict for one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionAnalysis {
    pub fen: String,
    pub evaluation: Option<f64>,
    pub best_move: Option<String>,
    pub best_move_san: Option<String>,
    pub continuation: Vec<String>,
    pub is_mate: bool,
    pub mate_in: Option<i32>,
    pub depth: Option<u32>,
    pub win_chance: Option<f64>,
}

impl PositionAnalysis {
    /// A valid "nothing known" result, distinct from a failed lookup.
    pub fn unevaluated(fen: impl Into<String>) -> Self {
        Self {
            fen: fen.into(),
            evaluation: None,
            best_move: None,
            best_move_san: None,
            continuation: Vec::new(),
            is_mate: false,
            mate_in: None,
            depth: None,
            win_chance: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_to_move_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SideToMove::White).unwrap(), "\"white\"");
        assert_eq!(serde_json::to_string(&SideToMove::Black).unwrap(), "\"black\"");
    }

    #[test]
    fn unevaluated_has_no_verdict() {
        let a = PositionAnalysis::unevaluated("8/8/8/8/8/8/8/8 w - - 0 1");
        assert!(a.evaluation.is_none());
        assert!(a.best_move.is_none());
        assert!(a.continuation.is_empty());
        assert!(!a.is_mate);
    }
}
