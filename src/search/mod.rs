pub mod alphabeta;
pub mod eval;
pub mod ordering;
pub mod pst;
pub mod tt;

pub use alphabeta::{SearchError, SearchParams, SearchResult, Searcher};
pub use eval::{EvalConfig, Evaluator, Weights};
