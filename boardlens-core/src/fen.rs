use crate::types::SideToMove;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 space-separated fields, got {0}")]
    FieldCount(usize),

    #[error("bad piece placement: {0}")]
    Placement(String),

    #[error("bad side to move: expected 'w' or 'b', got '{0}'")]
    SideToMove(String),

    #[error("bad castling rights: '{0}'")]
    Castling(String),

    #[error("bad en passant target: '{0}'")]
    EnPassant(String),

    #[error("bad halfmove clock: '{0}'")]
    HalfmoveClock(String),

    #[error("bad fullmove number: '{0}'")]
    FullmoveNumber(String),

    #[error("illegal position: {0}")]
    Illegal(String),
}

/// Structural legality problems a well-formed placement can still have.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LegalityIssue {
    #[error("expected exactly one white king, found {0}")]
    WhiteKings(usize),

    #[error("expected exactly one black king, found {0}")]
    BlackKings(usize),

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(String),

    #[error("en passant target {0} does not match the side to move")]
    EnPassantSide(String),
}

/// A parsed position string. Parsing checks the grammar only; use
/// [`Fen::legality_issues`] or [`validate_strict`] when structural
/// legality matters too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    pub placement: String,
    pub side_to_move: SideToMove,
    pub castling: String,
    pub en_passant: Option<String>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        validate_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => SideToMove::White,
            "b" => SideToMove::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        validate_castling(fields[2])?;
        let en_passant = validate_en_passant(fields[3])?;

        let halfmove_clock = fields[4]
            .parse::<u32>()
            .map_err(|_| FenError::HalfmoveClock(fields[4].to_string()))?;

        let fullmove_number = fields[5]
            .parse::<u32>()
            .map_err(|_| FenError::FullmoveNumber(fields[5].to_string()))?;
        if fullmove_number == 0 {
            return Err(FenError::FullmoveNumber(fields[5].to_string()));
        }

        Ok(Fen {
            placement: fields[0].to_string(),
            side_to_move,
            castling: fields[2].to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Structural legality checks: king counts, pawns on back ranks, and an
    /// en passant target consistent with the side to move. Deliberately not a
    /// full rules engine; it catches what board detection typically gets wrong.
    pub fn legality_issues(&self) -> Vec<LegalityIssue> {
        let mut issues = Vec::new();
        let ranks = expand_placement(&self.placement);

        let white_kings = ranks.iter().flatten().filter(|&&c| c == 'K').count();
        let black_kings = ranks.iter().flatten().filter(|&&c| c == 'k').count();
        if white_kings != 1 {
            issues.push(LegalityIssue::WhiteKings(white_kings));
        }
        if black_kings != 1 {
            issues.push(LegalityIssue::BlackKings(black_kings));
        }

        // ranks[0] is rank 8, ranks[7] is rank 1.
        for (rank_index, rank_number) in [(0usize, 8u32), (7, 1)] {
            for (file, &piece) in ranks[rank_index].iter().enumerate() {
                if piece == 'p' || piece == 'P' {
                    issues.push(LegalityIssue::PawnOnBackRank(square_name(file, rank_number)));
                }
            }
        }

        if let Some(ep) = &self.en_passant {
            let expected_rank = match self.side_to_move {
                SideToMove::White => '6',
                SideToMove::Black => '3',
            };
            if ep.chars().nth(1) != Some(expected_rank) {
                issues.push(LegalityIssue::EnPassantSide(ep.clone()));
            }
        }

        issues
    }

    pub fn is_legal(&self) -> bool {
        self.legality_issues().is_empty()
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.placement,
            match self.side_to_move {
                SideToMove::White => 'w',
                SideToMove::Black => 'b',
            },
            self.castling,
            self.en_passant.as_deref().unwrap_or("-"),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

/// Grammar-only check, cheap enough to run on every keystroke.
pub fn is_valid(fen: &str) -> bool {
    Fen::parse(fen).is_ok()
}

/// Grammar plus structural legality, for callers that opt in.
pub fn validate_strict(fen: &str) -> Result<Fen, FenError> {
    let parsed = Fen::parse(fen)?;
    if let Some(first) = parsed.legality_issues().first() {
        return Err(FenError::Illegal(first.to_string()));
    }
    Ok(parsed)
}

fn validate_placement(placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::Placement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    for (i, rank) in ranks.iter().enumerate() {
        let mut squares = 0u32;
        let mut prev_was_digit = false;
        for c in rank.chars() {
            if let Some(d) = c.to_digit(10) {
                if !(1..=8).contains(&d) || prev_was_digit {
                    return Err(FenError::Placement(format!(
                        "bad empty-square run in rank {}",
                        8 - i
                    )));
                }
                squares += d;
                prev_was_digit = true;
            } else if "pnbrqkPNBRQK".contains(c) {
                squares += 1;
                prev_was_digit = false;
            } else {
                return Err(FenError::Placement(format!(
                    "invalid character '{}' in rank {}",
                    c,
                    8 - i
                )));
            }
        }
        if squares != 8 {
            return Err(FenError::Placement(format!(
                "rank {} has {} squares, expected 8",
                8 - i,
                squares
            )));
        }
    }

    Ok(())
}

fn validate_castling(castling: &str) -> Result<(), FenError> {
    if castling == "-" {
        return Ok(());
    }
    if castling.is_empty() {
        return Err(FenError::Castling(castling.to_string()));
    }

    let mut seen = Vec::with_capacity(4);
    for c in castling.chars() {
        if !"KQkq".contains(c) || seen.contains(&c) {
            return Err(FenError::Castling(castling.to_string()));
        }
        seen.push(c);
    }

    Ok(())
}

fn validate_en_passant(ep: &str) -> Result<Option<String>, FenError> {
    if ep == "-" {
        return Ok(None);
    }

    let chars: Vec<char> = ep.chars().collect();
    let well_formed = chars.len() == 2
        && ('a'..='h').contains(&chars[0])
        && (chars[1] == '3' || chars[1] == '6');
    if !well_formed {
        return Err(FenError::EnPassant(ep.to_string()));
    }

    Ok(Some(ep.to_string()))
}

/// Expands a grammatically valid placement into 8 ranks of 8 squares,
/// rank 8 first, ' ' for empty squares.
fn expand_placement(placement: &str) -> Vec<Vec<char>> {
    placement
        .split('/')
        .map(|rank| {
            let mut squares = Vec::with_capacity(8);
            for c in rank.chars() {
                match c.to_digit(10) {
                    Some(d) => squares.extend(std::iter::repeat(' ').take(d as usize)),
                    None => squares.push(c),
                }
            }
            squares
        })
        .collect()
}

fn square_name(file: usize, rank_number: u32) -> String {
    let file_char = (b'a' + file as u8) as char;
    format!("{file_char}{rank_number}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_startpos() {
        let fen = Fen::parse(Fen::STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, SideToMove::White);
        assert_eq!(fen.castling, "KQkq");
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
    }

    #[test]
    fn parses_black_to_move_with_en_passant() {
        let fen = Fen::parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
            .unwrap();
        assert_eq!(fen.side_to_move, SideToMove::Black);
        assert_eq!(fen.en_passant.as_deref(), Some("e3"));
    }

    #[test]
    fn display_round_trips() {
        let original = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let parsed = Fen::parse(original).unwrap();
        assert_eq!(parsed.to_string(), original);

        let no_ep = Fen::parse(Fen::STARTPOS).unwrap();
        assert_eq!(no_ep.to_string(), Fen::STARTPOS);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(matches!(Fen::parse("invalid"), Err(FenError::FieldCount(1))));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w KQkq -"),
            Err(FenError::FieldCount(5))
        ));
    }

    #[test]
    fn rejects_bad_side_to_move() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::SideToMove(_))
        ));
    }

    #[test]
    fn rejects_bad_placement() {
        // Too few ranks.
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        // Unknown piece letter.
        assert!(matches!(
            Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Placement(_))
        ));
        // A rank with nine squares.
        assert!(matches!(
            Fen::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Placement(_))
        ));
        // Consecutive digits are not legal FEN even when the sum works out.
        assert!(matches!(
            Fen::parse("44/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        // Zero-length empty-square run.
        assert!(matches!(
            Fen::parse("80/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
    }

    #[test]
    fn rejects_bad_castling() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::Castling(_))
        ));
        // Duplicated right.
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w KK - 0 1"),
            Err(FenError::Castling(_))
        ));
    }

    #[test]
    fn accepts_partial_castling() {
        let fen = Fen::parse("8/8/8/8/8/8/8/8 w Kq - 0 1").unwrap();
        assert_eq!(fen.castling, "Kq");
    }

    #[test]
    fn rejects_bad_en_passant() {
        for ep in ["abc", "x3", "e4", "e9"] {
            let input = format!("8/8/8/8/8/8/8/8 w - {ep} 0 1");
            assert!(
                matches!(Fen::parse(&input), Err(FenError::EnPassant(_))),
                "expected rejection for en passant '{ep}'"
            );
        }
    }

    #[test]
    fn rejects_bad_counters() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::HalfmoveClock(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0 xyz"),
            Err(FenError::FullmoveNumber(_))
        ));
        // Fullmove numbering starts at 1.
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0 0"),
            Err(FenError::FullmoveNumber(_))
        ));
    }

    #[test]
    fn startpos_is_legal() {
        let fen = Fen::parse(Fen::STARTPOS).unwrap();
        assert!(fen.is_legal());
        assert!(fen.legality_issues().is_empty());
    }

    #[test]
    fn flags_missing_and_duplicate_kings() {
        let empty = Fen::parse("8/8/8/8/8/8/8/8 w - - 0 1").unwrap();
        assert_eq!(
            empty.legality_issues(),
            vec![LegalityIssue::WhiteKings(0), LegalityIssue::BlackKings(0)]
        );

        let two_white = Fen::parse("4k3/8/8/8/8/8/8/2K1K3 w - - 0 1").unwrap();
        assert_eq!(two_white.legality_issues(), vec![LegalityIssue::WhiteKings(2)]);
    }

    #[test]
    fn flags_pawns_on_back_ranks() {
        let fen = Fen::parse("P3k3/8/8/8/8/8/8/4K2p w - - 0 1").unwrap();
        let issues = fen.legality_issues();
        assert!(issues.contains(&LegalityIssue::PawnOnBackRank("a8".into())));
        assert!(issues.contains(&LegalityIssue::PawnOnBackRank("h1".into())));
    }

    #[test]
    fn flags_en_passant_on_wrong_side() {
        // White to move with a rank-3 target: only black could have a rank-3
        // target pending, so this placement is inconsistent.
        let fen = Fen::parse("4k3/8/8/8/4P3/8/8/4K3 w - e3 0 1").unwrap();
        assert_eq!(
            fen.legality_issues(),
            vec![LegalityIssue::EnPassantSide("e3".into())]
        );

        let ok = Fen::parse("4k3/8/8/4p3/8/8/8/4K3 w - e6 0 2").unwrap();
        assert!(ok.legality_issues().is_empty());
    }

    #[test]
    fn strict_validation_rejects_illegal_placements() {
        assert!(validate_strict(Fen::STARTPOS).is_ok());

        let err = validate_strict("8/8/8/8/8/8/8/8 w - - 0 1").unwrap_err();
        assert!(matches!(err, FenError::Illegal(_)));
        assert!(err.to_string().contains("white king"));
    }

    #[test]
    fn is_valid_matches_parse() {
        assert!(is_valid(Fen::STARTPOS));
        assert!(is_valid("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3"));
        assert!(!is_valid("invalid"));
        assert!(!is_valid(""));
    }
}
