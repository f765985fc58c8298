use crate::fen::Fen;

/// A named position offered when the user types a position by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionPreset {
    pub name: &'static str,
    pub fen: &'static str,
}

pub const PRESETS: &[PositionPreset] = &[
    PositionPreset {
        name: "Starting Position",
        fen: Fen::STARTPOS,
    },
    PositionPreset {
        name: "Italian Game",
        fen: "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3",
    },
    PositionPreset {
        name: "Sicilian Defense",
        fen: "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
    },
    PositionPreset {
        name: "Queen's Gambit",
        fen: "rnbqkbnr/ppp1pppp/8/3p4/2PP4/8/PP2PPPP/RNBQKBNR b KQkq c3 0 2",
    },
    PositionPreset {
        name: "Ruy Lopez",
        fen: "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3",
    },
];

pub fn preset_by_name(name: &str) -> Option<&'static PositionPreset> {
    PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_parses_and_is_legal() {
        for preset in PRESETS {
            let fen = Fen::parse(preset.fen)
                .unwrap_or_else(|e| panic!("preset '{}' failed to parse: {e}", preset.name));
            assert!(fen.is_legal(), "preset '{}' is not legal", preset.name);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let preset = preset_by_name("sicilian defense").unwrap();
        assert!(preset.fen.contains("2p5"));
        assert!(preset_by_name("London System").is_none());
    }

    #[test]
    fn first_preset_is_the_starting_position() {
        assert_eq!(PRESETS[0].fen, Fen::STARTPOS);
    }
}
