use std::io::{self, BufRead, Write};
use log::warn;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use crate::board::cozy::Position;
use crate::search::{SearchParams, Searcher};

/// Minimal line-oriented driver: enough of the UCI vocabulary to feed
/// positions and ask for a move at a fixed depth.
pub struct UciEngine {
    pos: Position,
    searcher: Searcher,
    rng: SmallRng,
}

impl UciEngine {
    pub fn new(params: SearchParams, seed: u64) -> Self {
        Self { pos: Position::startpos(), searcher: Searcher::new(params), rng: SmallRng::seed_from_u64(seed) }
    }

    pub fn position(&self) -> &Position { &self.pos }

    fn cmd_uci(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "id name NegaBot")?;
        writeln!(out, "id author NegaBot Team")?;
        writeln!(out, "uciok")
    }

    fn cmd_ucinewgame(&mut self) {
        self.pos = Position::startpos();
        self.searcher.tt_mut().clear();
    }

    /// Supports `startpos [moves ...]` and `fen <fen> [moves ...]`.
    pub fn cmd_position(&mut self, args: &str) {
        let mut tokens = args.split_whitespace();
        let fen = match tokens.next() {
            Some("startpos") => "startpos".to_string(),
            Some("fen") => tokens.by_ref().take_while(|t| *t != "moves").collect::<Vec<_>>().join(" "),
            _ => return,
        };
        let moves: Vec<String> = tokens.filter(|t| *t != "moves").map(|s| s.to_string()).collect();
        match Position::set_from_fen_and_moves(&fen, &moves) {
            Ok(p) => self.pos = p,
            Err(e) => warn!("ignoring position command: {}", e),
        }
    }

    /// Handles `go depth N`; anything else falls back to the configured depth.
    pub fn cmd_go(&mut self, args: &str, out: &mut impl Write) -> io::Result<()> {
        let mut depth = self.searcher.params().depth.max(1);
        let mut tokens = args.split_whitespace();
        while let Some(tok) = tokens.next() {
            if tok == "depth" {
                if let Some(d) = tokens.next().and_then(|s| s.parse::<u32>().ok()) { depth = d.max(1); }
            }
        }
        match self.searcher.choose_move(&mut self.pos, depth, &mut self.rng) {
            Ok(Some(res)) => {
                writeln!(out, "info depth {} score cp {} nodes {}", depth, res.best_eval, res.nodes + res.qnodes)?;
                writeln!(out, "bestmove {}", res.best_move)
            }
            Ok(None) => writeln!(out, "bestmove 0000"),
            Err(e) => {
                warn!("search failed: {}", e);
                writeln!(out, "bestmove 0000")
            }
        }
    }

    /// Returns `false` once `quit` is read.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let line = line.trim();
        match line {
            "" => {}
            "uci" => self.cmd_uci(out)?,
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => self.cmd_ucinewgame(),
            "quit" => return Ok(false),
            _ => {
                if let Some(rest) = line.strip_prefix("position ") { self.cmd_position(rest); }
                else if let Some(rest) = line.strip_prefix("go") { self.cmd_go(rest, out)?; }
            }
        }
        out.flush()?;
        Ok(true)
    }

    pub fn run_loop(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in stdin.lock().lines() {
            if !self.handle_line(&line?, &mut out)? { break; }
        }
        Ok(())
    }
}
