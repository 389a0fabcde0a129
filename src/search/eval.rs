use cozy_chess::{Color, Piece, Square};
use serde::{Deserialize, Serialize};
use crate::board::Rules;
use crate::search::pst::{self, PstOrientation};

// Mate scoring helpers
pub const MATE_SCORE: i32 = 30_000;
pub const DRAW_SCORE: i32 = 0;
/// Window bound strictly outside every reachable score.
pub const INF: i32 = 32_000;

const PST_SCALE: i32 = 10;
const MOP_UP_SCALE: i32 = 10;
const NON_PAWN: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

/// Material weights in centipawns. The king weight only feeds capture
/// ordering; kings are never summed into material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    pub pawn: i32,
    pub knight: i32,
    pub bishop: i32,
    pub rook: i32,
    pub queen: i32,
    pub king: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Self { pawn: 100, knight: 350, bishop: 350, rook: 525, queen: 1000, king: 10_000 }
    }
}

impl Weights {
    pub fn value(&self, piece: Piece) -> i32 {
        match piece {
            Piece::Pawn => self.pawn,
            Piece::Knight => self.knight,
            Piece::Bishop => self.bishop,
            Piece::Rook => self.rook,
            Piece::Queen => self.queen,
            Piece::King => self.king,
        }
    }

    /// Non-pawn material of both sides in the standard starting position.
    pub fn max_material(&self) -> i32 {
        2 * (2 * self.knight + 2 * self.bishop + 2 * self.rook + self.queen)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub weights: Weights,
    pub pst_orientation: PstOrientation,
    /// Total non-pawn material at or below which king confinement applies.
    pub endgame_material_floor: i32,
    /// Material lead a side needs before confinement works in its favor.
    pub mop_up_margin: i32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            pst_orientation: PstOrientation::Mirrored,
            endgame_material_floor: 1750,
            mop_up_margin: 200,
        }
    }
}

/// Static scorer: material, piece-square bonuses and the endgame
/// king-confinement term.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

#[derive(Default)]
struct SideCounts {
    material: i32,
    non_pawn: i32,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self { Self { config } }

    pub fn config(&self) -> &EvalConfig { &self.config }

    /// Score from the side to move's point of view.
    pub fn evaluate<R: Rules + ?Sized>(&self, pos: &R) -> i32 {
        let base = self.evaluate_white(pos);
        if pos.side_to_move() == Color::White { base } else { -base }
    }

    /// Score from White's point of view, independent of the side to move.
    pub fn evaluate_white<R: Rules + ?Sized>(&self, pos: &R) -> i32 {
        let white = self.counts(pos, Color::White);
        let black = self.counts(pos, Color::Black);
        let mut score = white.material - black.material;
        score += self.positional(pos, Color::White) - self.positional(pos, Color::Black);
        score += self.endgame(pos, &white, &black);
        score
    }

    /// Endgame phase numerator over `max_material`: 0 with all pieces on the
    /// board, `max_material` once only kings and pawns remain.
    pub fn endgame_weight<R: Rules + ?Sized>(&self, pos: &R) -> (i32, i32) {
        let non_pawn = self.counts(pos, Color::White).non_pawn + self.counts(pos, Color::Black).non_pawn;
        self.phase(non_pawn)
    }

    fn phase(&self, non_pawn: i32) -> (i32, i32) {
        let max = self.config.weights.max_material().max(1);
        ((max - non_pawn).clamp(0, max), max)
    }

    fn counts<R: Rules + ?Sized>(&self, pos: &R, color: Color) -> SideCounts {
        let w = &self.config.weights;
        let mut c = SideCounts {
            material: pos.piece_squares(Piece::Pawn, color).len() as i32 * w.pawn,
            ..SideCounts::default()
        };
        for piece in NON_PAWN {
            let v = pos.piece_squares(piece, color).len() as i32 * w.value(piece);
            c.material += v;
            c.non_pawn += v;
        }
        c
    }

    fn positional<R: Rules + ?Sized>(&self, pos: &R, color: Color) -> i32 {
        let mut sum = 0;
        for piece in Piece::ALL {
            for sq in pos.piece_squares(piece, color) {
                sum += pst::value(piece, color, sq, self.config.pst_orientation);
            }
        }
        sum * PST_SCALE
    }

    fn endgame<R: Rules + ?Sized>(&self, pos: &R, white: &SideCounts, black: &SideCounts) -> i32 {
        let non_pawn = white.non_pawn + black.non_pawn;
        if non_pawn > self.config.endgame_material_floor { return 0; }
        let (num, den) = self.phase(non_pawn);
        let margin = self.config.mop_up_margin;
        if white.material >= black.material + margin {
            self.confinement(pos, Color::White, num, den)
        } else if black.material >= white.material + margin {
            -self.confinement(pos, Color::Black, num, den)
        } else {
            0
        }
    }

    /// Bonus for `winner`: push the losing king to the edge and walk the
    /// winning king towards it.
    fn confinement<R: Rules + ?Sized>(&self, pos: &R, winner: Color, num: i32, den: i32) -> i32 {
        let own = pos.piece_squares(Piece::King, winner).into_iter().next();
        let theirs = pos.piece_squares(Piece::King, !winner).into_iter().next();
        let (Some(own), Some(theirs)) = (own, theirs) else { return 0 };
        let raw = center_distance(theirs) + (14 - manhattan(own, theirs));
        raw * MOP_UP_SCALE * num / den
    }
}

fn center_distance(sq: Square) -> i32 {
    let f = sq.file() as i32;
    let r = sq.rank() as i32;
    (3 - f).max(f - 4) + (3 - r).max(r - 4)
}

fn manhattan(a: Square, b: Square) -> i32 {
    (a.file() as i32 - b.file() as i32).abs() + (a.rank() as i32 - b.rank() as i32).abs()
}

/// Static evaluation with the default configuration.
pub fn eval_cp<R: Rules + ?Sized>(pos: &R) -> i32 {
    Evaluator::default().evaluate(pos)
}

// Side-agnostic material in centipawns: positive means White has more material.
pub fn material_eval_cp_side_agnostic<R: Rules + ?Sized>(pos: &R) -> i32 {
    let e = Evaluator::default();
    e.counts(pos, Color::White).material - e.counts(pos, Color::Black).material
}

// Material from side-to-move perspective (negamax-friendly)
pub fn material_eval_cp<R: Rules + ?Sized>(pos: &R) -> i32 {
    let base = material_eval_cp_side_agnostic(pos);
    if pos.side_to_move() == Color::White { base } else { -base }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cozy::Position;

    #[test]
    fn max_material_matches_start_position() {
        let e = Evaluator::default();
        assert_eq!(e.endgame_weight(&Position::startpos()), (0, 6900));
    }

    #[test]
    fn center_distance_is_zero_in_the_middle() {
        assert_eq!(center_distance("e4".parse().unwrap()), 0);
        assert_eq!(center_distance("a1".parse().unwrap()), 6);
        assert_eq!(manhattan("a1".parse().unwrap(), "h8".parse().unwrap()), 14);
    }

    #[test]
    fn confinement_prefers_cornered_king() {
        let e = Evaluator::default();
        let corner = Position::from_fen("k7/8/2K5/8/8/8/8/7R w - - 0 1").unwrap();
        let center = Position::from_fen("8/8/2K5/8/4k3/8/8/7R w - - 0 1").unwrap();
        assert!(e.endgame(&corner, &e.counts(&corner, Color::White), &e.counts(&corner, Color::Black))
            > e.endgame(&center, &e.counts(&center, Color::White), &e.counts(&center, Color::Black)));
    }

    #[test]
    fn confinement_switches_on_at_material_floor() {
        let at_floor = Evaluator::new(EvalConfig { weights: Weights { bishop: 351, ..Weights::default() }, ..EvalConfig::default() });
        let endgame = |e: &Evaluator, pos: &Position| {
            e.endgame(pos, &e.counts(pos, Color::White), &e.counts(pos, Color::Black))
        };
        // five knights: 1750 non-pawn material
        let knights = Position::from_fen("k7/8/2K5/8/8/8/8/NNNNN3 w - - 0 1").unwrap();
        assert_eq!(at_floor.counts(&knights, Color::White).non_pawn, 1750);
        assert!(endgame(&at_floor, &knights) > 0);
        // four knights and a 351 bishop: 1751
        let over = Position::from_fen("k7/8/2K5/8/8/8/8/NNNNB3 w - - 0 1").unwrap();
        assert_eq!(at_floor.counts(&over, Color::White).non_pawn, 1751);
        assert_eq!(endgame(&at_floor, &over), 0);
    }
}
