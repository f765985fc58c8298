use crate::types::PositionAnalysis;

/// Moves shown when previewing an engine line.
pub const LINE_PREVIEW_MOVES: usize = 6;

/// Evaluations beyond this many pawns saturate the advantage bar.
const EVAL_CLAMP_PAWNS: f64 = 10.0;

/// Display-ready projection of a [`PositionAnalysis`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisDisplay {
    /// White's winning chances as a bar percentage, 0 to 100.
    pub advantage_percent: f64,
    /// Short verdict, e.g. "+1.5", "M3" or "?" when nothing is known.
    pub evaluation_label: String,
    /// Best move in SAN when available, otherwise a formatted UCI move.
    pub best_move: Option<String>,
    /// Origin and destination squares of the best move, for highlighting.
    pub highlight_squares: Vec<String>,
    /// First few moves of the principal variation, in engine notation.
    pub line_preview: Option<String>,
}

impl AnalysisDisplay {
    pub fn from_analysis(analysis: &PositionAnalysis) -> Self {
        let mate = if analysis.is_mate { analysis.mate_in } else { None };

        let best_move = analysis
            .best_move_san
            .clone()
            .or_else(|| analysis.best_move.as_deref().map(format_uci_move));

        let highlight_squares = analysis
            .best_move
            .as_deref()
            .map(move_squares)
            .unwrap_or_default();

        let line_preview = if analysis.continuation.is_empty() {
            None
        } else {
            Some(line_preview(&analysis.continuation))
        };

        AnalysisDisplay {
            advantage_percent: white_advantage_percent(analysis.evaluation, mate),
            evaluation_label: evaluation_label(analysis.evaluation, mate),
            best_move,
            highlight_squares,
            line_preview,
        }
    }
}

/// Maps an evaluation to White's share of a 0..=100 advantage bar.
///
/// Mate dominates: a forced mate pins the bar to the winning side. Otherwise
/// the evaluation is clamped to +-10 pawns and scaled linearly, so an unknown
/// evaluation sits at the 50% midpoint.
pub fn white_advantage_percent(evaluation: Option<f64>, mate_in: Option<i32>) -> f64 {
    if let Some(mate) = mate_in {
        return if mate > 0 { 100.0 } else { 0.0 };
    }
    match evaluation {
        Some(eval) => 50.0 + eval.clamp(-EVAL_CLAMP_PAWNS, EVAL_CLAMP_PAWNS) * 5.0,
        None => 50.0,
    }
}

/// Short verdict text: "M3" for mate in three, signed pawns otherwise,
/// "?" when there is no verdict at all.
pub fn evaluation_label(evaluation: Option<f64>, mate_in: Option<i32>) -> String {
    if let Some(mate) = mate_in {
        return format!("M{}", mate.abs());
    }
    match evaluation {
        Some(eval) if eval > 0.0 => format!("+{eval:.1}"),
        Some(eval) => format!("{eval:.1}"),
        None => "?".to_string(),
    }
}

/// Renders a UCI move for humans: "e2e4" becomes "e2-e4" and a promotion
/// "e7e8q" becomes "e7-e8=Q". Anything shorter than 4 characters passes
/// through unchanged.
pub fn format_uci_move(uci: &str) -> String {
    let chars: Vec<char> = uci.chars().collect();
    if chars.len() < 4 {
        return uci.to_string();
    }

    let from: String = chars[0..2].iter().collect();
    let to: String = chars[2..4].iter().collect();
    match chars.get(4) {
        Some(promotion) => format!("{from}-{to}={}", promotion.to_ascii_uppercase()),
        None => format!("{from}-{to}"),
    }
}

/// Origin and destination squares of a UCI move, or nothing when the
/// move is too short to name both.
pub fn move_squares(uci: &str) -> Vec<String> {
    let chars: Vec<char> = uci.chars().collect();
    if chars.len() < 4 {
        return Vec::new();
    }
    vec![chars[0..2].iter().collect(), chars[2..4].iter().collect()]
}

/// First [`LINE_PREVIEW_MOVES`] moves of a variation, joined for display.
/// Moves stay in engine notation; only the best move gets formatted.
pub fn line_preview(moves: &[String]) -> String {
    moves
        .iter()
        .take(LINE_PREVIEW_MOVES)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}
