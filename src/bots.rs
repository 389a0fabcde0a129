//! Playable bots: a uniform random mover and the searching engine.

use cozy_chess::Piece;
use rand::seq::SliceRandom;
use rand::RngCore;
use thiserror::Error;
use crate::board::cozy::Position;
use crate::board::{Move, Rules, RulesError};
use crate::search::{SearchError, SearchParams, Searcher};

#[derive(Debug, Error)]
pub enum BotError {
    #[error("unknown bot: {0}")]
    Unknown(String),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// A chosen move plus the promotion piece to play with it, if any.
pub type BotMove = (Move, Option<Piece>);

pub trait Bot {
    fn name(&self) -> &str;
    /// Picks a move for the side to move; `None` when no legal move exists.
    fn select(&mut self, pos: &mut Position, rng: &mut dyn RngCore) -> Result<Option<BotMove>, BotError>;
}

const PROMOTION_CHOICES: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Knight, Piece::Bishop];

/// Plays a uniformly random legal move and picks its own promotion piece.
#[derive(Default)]
pub struct RandomBot;

impl Bot for RandomBot {
    fn name(&self) -> &str { "Dumb Bot" }

    fn select(&mut self, pos: &mut Position, rng: &mut dyn RngCore) -> Result<Option<BotMove>, BotError> {
        let moves = pos.legal_moves();
        let Some(&mv) = moves.choose(rng) else { return Ok(None) };
        if mv.promotion.is_none() { return Ok(Some((mv, None))); }
        let piece = PROMOTION_CHOICES.choose(rng).copied().unwrap_or(Piece::Queen);
        let promoted = moves.iter()
            .find(|m| m.from == mv.from && m.to == mv.to && m.promotion == Some(piece))
            .copied()
            .unwrap_or(mv);
        Ok(Some((promoted, promoted.promotion)))
    }
}

/// Negamax searcher at a fixed depth; ties are broken by the supplied rng.
pub struct SearchBot {
    searcher: Searcher,
}

impl SearchBot {
    pub fn new(params: SearchParams) -> Self { Self { searcher: Searcher::new(params) } }
    pub fn searcher(&self) -> &Searcher { &self.searcher }
}

impl Default for SearchBot {
    fn default() -> Self { Self::new(SearchParams::default()) }
}

impl Bot for SearchBot {
    fn name(&self) -> &str { "Smart Bot" }

    fn select(&mut self, pos: &mut Position, rng: &mut dyn RngCore) -> Result<Option<BotMove>, BotError> {
        let res = self.searcher.search_with_params(pos, rng)?;
        Ok(res.map(|r| (r.best_move, r.promotion)))
    }
}

/// Names of every available bot, strongest first.
pub fn roster() -> Vec<&'static str> {
    vec!["Smart Bot", "Dumb Bot"]
}

/// Builds a bot by roster name (case-insensitive; `smart` and `random` also work).
pub fn bot_by_name(name: &str, params: SearchParams) -> Result<Box<dyn Bot>, BotError> {
    match name.to_ascii_lowercase().as_str() {
        "smart bot" | "smart" | "search" => Ok(Box::new(SearchBot::new(params))),
        "dumb bot" | "dumb" | "random" => Ok(Box::new(RandomBot)),
        _ => Err(BotError::Unknown(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn random_bot_picks_varied_promotions() {
        let mut pos = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let mut bot = RandomBot;
        let mut rng = SmallRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..400 {
            if let Some((mv, promo)) = bot.select(&mut pos, &mut rng).unwrap() {
                assert_eq!(mv.promotion, promo);
                if let Some(p) = promo { seen.insert(p); }
            }
        }
        assert_eq!(seen.len(), 4, "expected all promotion pieces, got {:?}", seen);
    }

    #[test]
    fn roster_names_resolve() {
        for name in roster() {
            let bot = bot_by_name(name, SearchParams::default()).unwrap();
            assert_eq!(bot.name(), name);
        }
        assert!(bot_by_name("grandmaster", SearchParams::default()).is_err());
    }
}
