// Negamax alpha-beta move selection over a pluggable rules engine
pub mod board;
pub mod bots;
pub mod perft;
pub mod search;
pub mod selfplay;
pub mod uci;

pub use board::{Move, MoveGuard, Rules, RulesError};
pub use board::cozy::Position;
pub use search::{SearchParams, SearchResult, Searcher};
