use cozy_chess::{Color, Piece};
use std::cmp::Reverse;
use crate::board::{Move, Rules};
use crate::search::eval::EvalConfig;
use crate::search::pst;

/// A move paired with its ordering guess; lives for one node only.
#[derive(Clone, Copy, Debug)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Heuristic guess of how promising `mv` is. Only affects node counts.
pub fn score_move<R: Rules + ?Sized>(pos: &R, mv: &Move, opponent: Color, cfg: &EvalConfig) -> i32 {
    let w = &cfg.weights;
    let attacker = w.value(mv.piece);
    let mut score = 0;
    // MVV-LVA
    if let Some(victim) = mv.captured {
        score += 10 * w.value(victim) - attacker;
    }
    if let Some(promo) = mv.promotion {
        score += w.value(promo);
    }
    let pawn_guards = pos.attackers(mv.to, opponent) & pos.piece_squares(Piece::Pawn, opponent);
    if !pawn_guards.is_empty() {
        score -= attacker;
    }
    score += 10 * pst::value(mv.piece, !opponent, mv.to, cfg.pst_orientation);
    score
}

pub fn score_moves<R: Rules + ?Sized>(pos: &R, moves: &[Move], opponent: Color, cfg: &EvalConfig) -> Vec<ScoredMove> {
    moves.iter().map(|&mv| ScoredMove { mv, score: score_move(pos, &mv, opponent, cfg) }).collect()
}

/// Sorts `moves` in place, best guess first. Ties keep generation order.
pub fn order_moves<R: Rules + ?Sized>(pos: &R, moves: &mut Vec<Move>, opponent: Color, cfg: &EvalConfig) {
    let mut scored = score_moves(pos, moves, opponent, cfg);
    scored.sort_by_key(|s| Reverse(s.score));
    moves.clear();
    moves.extend(scored.into_iter().map(|s| s.mv));
}
