use cozy_chess::Piece;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use crate::board::{Move, MoveGuard, Rules, RulesError};
use crate::search::eval::{EvalConfig, Evaluator, DRAW_SCORE, INF, MATE_SCORE};
use crate::search::ordering::order_moves;
use crate::search::tt::{Bound, Entry, Tt, DEFAULT_ENTRIES};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search depth must be at least 1")]
    ZeroDepth,
    #[error(transparent)]
    Rules(#[from] RulesError),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub depth: u32,
    pub use_tt: bool,
    /// Reuse a cached entry only at the depth it was stored with. Deeper
    /// entries would make fixed-depth scores depend on visit order.
    pub tt_exact_depth: bool,
    pub order_moves: bool,
    pub tt_entries: usize,
    /// Capture plies explored past the horizon before stand-pat is forced.
    pub max_qsearch_depth: u32,
    pub max_nodes: Option<u64>,
    pub movetime_ms: Option<u64>,
    pub eval: EvalConfig,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            depth: 3,
            use_tt: true,
            tt_exact_depth: true,
            order_moves: true,
            tt_entries: DEFAULT_ENTRIES,
            max_qsearch_depth: 16,
            max_nodes: None,
            movetime_ms: None,
            eval: EvalConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Move,
    /// Promotion piece carried on the chosen move, if it promotes.
    pub promotion: Option<Piece>,
    pub best_eval: i32,
    /// Every root move that scored exactly `best_eval`.
    pub ties: Vec<Move>,
    pub nodes: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    /// False when the budget ran out before any root move was fully searched;
    /// `best_eval` then falls back to the static evaluation.
    pub complete: bool,
}

/// Outcome of consulting the table for one child position.
enum Probe {
    /// Cached value stands in for searching the move.
    Use(i32),
    /// Cached lower bound already fails high.
    Cutoff,
    /// Search the move, possibly with a raised alpha.
    Search(i32),
}

pub struct Searcher {
    tt: Tt,
    evaluator: Evaluator,
    params: SearchParams,
    pub(crate) nodes: u64,
    pub(crate) qnodes: u64,
    tt_hits: u64,
    deadline: Option<Instant>,
    stopped: bool,
}

impl Default for Searcher {
    fn default() -> Self { Self::new(SearchParams::default()) }
}

impl Searcher {
    pub fn new(params: SearchParams) -> Self {
        Self {
            tt: Tt::with_capacity_entries(params.tt_entries),
            evaluator: Evaluator::new(params.eval),
            params,
            nodes: 0,
            qnodes: 0,
            tt_hits: 0,
            deadline: None,
            stopped: false,
        }
    }

    pub fn params(&self) -> &SearchParams { &self.params }

    /// Replaces the parameters; the table is rebuilt only if its size changed.
    pub fn set_params(&mut self, params: SearchParams) {
        if params.tt_entries != self.params.tt_entries {
            self.tt = Tt::with_capacity_entries(params.tt_entries);
        }
        self.evaluator = Evaluator::new(params.eval);
        self.params = params;
    }

    pub fn evaluator(&self) -> &Evaluator { &self.evaluator }
    pub fn tt(&self) -> &Tt { &self.tt }
    pub fn tt_mut(&mut self) -> &mut Tt { &mut self.tt }
    pub fn nodes(&self) -> u64 { self.nodes }
    pub fn qnodes(&self) -> u64 { self.qnodes }

    pub fn tt_probe<R: Rules + ?Sized>(&self, pos: &R) -> Option<(u32, Bound)> {
        self.tt.get(pos.hash()).map(|e| (e.depth, e.bound))
    }

    pub fn set_tt_capacity_mb(&mut self, mb: usize) {
        self.tt.set_capacity_mb(mb);
        self.params.tt_entries = self.tt.capacity();
    }

    /// Resets counters and the budget clock for a fresh top-level call.
    pub fn reset_stats(&mut self) {
        self.nodes = 0;
        self.qnodes = 0;
        self.tt_hits = 0;
        self.stopped = false;
        self.deadline = self.params.movetime_ms.map(|ms| Instant::now() + Duration::from_millis(ms));
    }

    pub fn search_with_params<R: Rules, G: Rng + ?Sized>(&mut self, pos: &mut R, rng: &mut G) -> Result<Option<SearchResult>, SearchError> {
        self.choose_move(pos, self.params.depth, rng)
    }

    /// Searches every root move with a full window and picks uniformly among
    /// the moves that share the best score. `None` when there is no legal move.
    pub fn choose_move<R: Rules, G: Rng + ?Sized>(&mut self, pos: &mut R, depth: u32, rng: &mut G) -> Result<Option<SearchResult>, SearchError> {
        if depth == 0 { return Err(SearchError::ZeroDepth); }
        self.reset_stats();
        self.tt.bump_generation();

        let moves = pos.legal_moves();
        let mut best_eval = -INF;
        let mut ties: Vec<Move> = Vec::new();
        let mut complete = true;
        for mv in moves {
            if !ties.is_empty() && self.out_of_budget() { break; }
            let score = {
                let mut child = MoveGuard::apply(pos, &mv)?;
                -self.search(&mut *child, depth - 1, -INF, INF)?
            };
            // an interrupted subtree only counts when nothing else was scored
            if self.stopped && !ties.is_empty() { break; }
            if self.stopped {
                complete = false;
                debug!("root move {} interrupted", mv);
                best_eval = self.evaluator.evaluate(pos);
                ties.push(mv);
                break;
            }
            debug!("root move {} scored {}", mv, score);
            if score > best_eval {
                best_eval = score;
                ties.clear();
                ties.push(mv);
            } else if score == best_eval {
                ties.push(mv);
            }
        }

        let Some(&best_move) = ties.choose(rng) else { return Ok(None) };
        info!(
            "best move {} eval {} ({} tied), positions calculated {} (+{} quiescence)",
            best_move, best_eval, ties.len(), self.nodes, self.qnodes
        );
        Ok(Some(SearchResult {
            best_move,
            promotion: best_move.promotion,
            best_eval,
            ties,
            nodes: self.nodes,
            qnodes: self.qnodes,
            tt_hits: self.tt_hits,
            complete,
        }))
    }

    /// Fail-hard negamax. Returns a score in `[alpha, beta]` from the side to
    /// move's perspective.
    pub fn search<R: Rules + ?Sized>(&mut self, pos: &mut R, depth: u32, mut alpha: i32, beta: i32) -> Result<i32, SearchError> {
        if depth == 0 { return self.quiescence(pos, alpha, beta); }
        self.nodes += 1;

        let mut moves = pos.legal_moves();
        if moves.is_empty() {
            return Ok(if pos.in_check() { mated_score(depth) } else { DRAW_SCORE });
        }
        if self.params.order_moves {
            order_moves(pos, &mut moves, !pos.side_to_move(), &self.params.eval);
        }

        for mv in &moves {
            if self.out_of_budget() { break; }
            let evaluation = {
                let mut child = MoveGuard::apply(pos, mv)?;
                let key = child.hash();
                match self.probe(key, depth, alpha, beta) {
                    Probe::Use(score) => score,
                    Probe::Cutoff => return Ok(beta),
                    Probe::Search(raised) => {
                        alpha = raised;
                        let e = -self.search(&mut *child, depth - 1, -beta, -alpha)?;
                        if !self.stopped {
                            let bound = if e <= alpha { Bound::Upper } else if e >= beta { Bound::Lower } else { Bound::Exact };
                            self.tt_put(key, depth, e, bound);
                        }
                        e
                    }
                }
            };
            if evaluation >= beta { return Ok(beta); }
            alpha = alpha.max(evaluation);
        }
        Ok(alpha)
    }

    pub fn quiescence<R: Rules + ?Sized>(&mut self, pos: &mut R, alpha: i32, beta: i32) -> Result<i32, SearchError> {
        self.qsearch(pos, alpha, beta, 0)
    }

    pub fn qsearch_eval_cp<R: Rules + ?Sized>(&mut self, pos: &mut R) -> Result<i32, SearchError> {
        self.quiescence(pos, -INF, INF)
    }

    fn qsearch<R: Rules + ?Sized>(&mut self, pos: &mut R, mut alpha: i32, beta: i32, qply: u32) -> Result<i32, SearchError> {
        self.qnodes += 1;
        // Stand pat
        let stand = self.evaluator.evaluate(pos);
        if stand >= beta { return Ok(beta); }
        if stand > alpha { alpha = stand; }
        if qply >= self.params.max_qsearch_depth { return Ok(alpha); }

        // Captures only
        let mut caps = pos.capture_moves();
        if self.params.order_moves {
            order_moves(pos, &mut caps, !pos.side_to_move(), &self.params.eval);
        }
        for mv in &caps {
            if self.out_of_budget() { break; }
            let score = {
                let mut child = MoveGuard::apply(pos, mv)?;
                -self.qsearch(&mut *child, -beta, -alpha, qply + 1)?
            };
            if score >= beta { return Ok(beta); }
            if score > alpha { alpha = score; }
        }
        Ok(alpha)
    }

    fn probe(&mut self, key: u64, depth: u32, alpha: i32, beta: i32) -> Probe {
        if !self.params.use_tt { return Probe::Search(alpha); }
        let Some(en) = self.tt.get(key) else { return Probe::Search(alpha) };
        let usable = if self.params.tt_exact_depth { en.depth == depth } else { en.depth >= depth };
        if !usable { return Probe::Search(alpha); }
        self.tt_hits += 1;
        match en.bound {
            Bound::Exact => Probe::Use(en.score),
            Bound::Lower if en.score >= beta => Probe::Cutoff,
            Bound::Lower => Probe::Search(alpha.max(en.score)),
            Bound::Upper if en.score <= alpha => Probe::Use(en.score),
            Bound::Upper => Probe::Search(alpha),
        }
    }

    fn tt_put(&mut self, key: u64, depth: u32, score: i32, bound: Bound) {
        if !self.params.use_tt { return; }
        self.tt.put(Entry { key, depth, score, bound, gen: 0 });
    }

    fn out_of_budget(&mut self) -> bool {
        if self.stopped { return true; }
        let over_nodes = self.params.max_nodes.map_or(false, |n| self.nodes + self.qnodes >= n);
        let over_time = self.deadline.map_or(false, |dl| Instant::now() >= dl);
        if over_nodes || over_time {
            debug!("search budget exhausted after {} nodes", self.nodes + self.qnodes);
            self.stopped = true;
        }
        self.stopped
    }
}

/// Score of the side to move when it is checkmated with `depth` plies of
/// search left. Mates found closer to the root carry a larger magnitude.
pub fn mated_score(depth: u32) -> i32 {
    -(MATE_SCORE + depth as i32)
}
