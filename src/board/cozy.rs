use cozy_chess::{
    get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves,
    BitBoard, Board as CozyBoard, Color, File, Piece, Rank, Square,
};
use super::{piece_char, Move, Rules, RulesError};

/// Concrete rules engine backed by `cozy-chess`, with a board history so
/// moves can be undone in strict stack order.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    history: Vec<CozyBoard>,
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default(), history: Vec::with_capacity(128) }
    }

    /// Accepts a FEN string or the literal `startpos`.
    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        if fen.trim() == "startpos" { return Ok(Self::startpos()); }
        CozyBoard::from_fen(fen.trim(), false)
            .map(|b| Self { board: b, history: Vec::with_capacity(128) })
            .map_err(|e| RulesError::Fen(format!("{e:?}")))
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    /// Number of moves applied since construction (and not undone).
    pub fn ply(&self) -> usize { self.history.len() }

    pub fn halfmove_clock(&self) -> u8 { self.board.halfmove_clock() }

    /// Resolves a UCI move string against the legal moves. Castling is
    /// accepted as `e1g1` or in king-takes-rook form `e1h1`.
    pub fn find_move_uci(&self, mv_uci: &str) -> Option<Move> {
        self.legal_moves().into_iter().find(|m| {
            format!("{}", m) == mv_uci || format!("{}", m.to_cozy()) == mv_uci
        })
    }

    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<Move, RulesError> {
        let mv = self.find_move_uci(mv_uci).ok_or_else(|| RulesError::IllegalMove(mv_uci.to_string()))?;
        self.apply_move(&mv)?;
        Ok(mv)
    }

    pub fn legal_moves_count(&self) -> usize {
        let mut ct = 0usize;
        self.board.generate_moves(|moves| { ct += moves.len(); false });
        ct
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self, RulesError> {
        Self::set_from_fen_and_moves("startpos", moves)
    }

    pub fn set_from_fen_and_moves(fen: &str, moves: &[String]) -> Result<Self, RulesError> {
        let mut pos = Self::from_fen(fen)?;
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }

    /// Color-flipped counterpart: ranks reflected, piece colors swapped and
    /// the side to move flipped. Castling and en passant rights are dropped.
    pub fn mirrored(&self) -> Result<Self, RulesError> {
        let mut fen = String::with_capacity(80);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let src = Square::new(File::index(file), Rank::index(7 - rank));
                match self.piece_at(src) {
                    Some((piece, color)) => {
                        if empty > 0 { fen.push_str(&empty.to_string()); empty = 0; }
                        let ch = piece_char(piece);
                        fen.push(if !color == Color::White { ch.to_ascii_uppercase() } else { ch });
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 { fen.push_str(&empty.to_string()); }
            if rank > 0 { fen.push('/'); }
        }
        fen.push_str(if self.side_to_move() == Color::White { " b" } else { " w" });
        fen.push_str(" - - 0 1");
        Self::from_fen(&fen)
    }

    fn annotate(&self, mv: cozy_chess::Move, piece: Piece) -> Move {
        let b = &self.board;
        let stm = b.side_to_move();
        let on_to = b.piece_on(mv.to).zip(b.color_on(mv.to));
        let castle = piece == Piece::King && matches!(on_to, Some((_, c)) if c == stm);
        let captured = match on_to {
            Some((p, c)) if c != stm => Some(p),
            // en passant: diagonal pawn move onto an empty square
            None if piece == Piece::Pawn && mv.from.file() != mv.to.file() => Some(Piece::Pawn),
            _ => None,
        };
        let mut child = b.clone();
        child.play_unchecked(mv);
        let gives_check = !child.checkers().is_empty();
        Move { from: mv.from, to: mv.to, piece, captured, promotion: mv.promotion, gives_check, castle }
    }
}

impl Rules for Position {
    fn legal_moves(&self) -> Vec<Move> {
        let mut out = Vec::with_capacity(64);
        self.board.generate_moves(|pm| {
            let piece = pm.piece;
            for m in pm { out.push(self.annotate(m, piece)); }
            false
        });
        out
    }

    fn apply_move(&mut self, mv: &Move) -> Result<(), RulesError> {
        let raw = mv.to_cozy();
        if !self.board.is_legal(raw) {
            return Err(RulesError::IllegalMove(format!("{}", mv)));
        }
        self.history.push(self.board.clone());
        self.board.play_unchecked(raw);
        Ok(())
    }

    fn undo_move(&mut self) -> Result<(), RulesError> {
        self.board = self.history.pop().ok_or(RulesError::EmptyHistory)?;
        Ok(())
    }

    fn side_to_move(&self) -> Color { self.board.side_to_move() }

    fn in_check(&self) -> bool { !self.board.checkers().is_empty() }

    fn piece_squares(&self, piece: Piece, color: Color) -> BitBoard {
        self.board.colors(color) & self.board.pieces(piece)
    }

    fn attackers(&self, square: Square, color: Color) -> BitBoard {
        let b = &self.board;
        let occ = b.occupied();
        let diag = b.pieces(Piece::Bishop) | b.pieces(Piece::Queen);
        let ortho = b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        b.colors(color) & (
            (get_pawn_attacks(square, !color) & b.pieces(Piece::Pawn))
                | (get_knight_moves(square) & b.pieces(Piece::Knight))
                | (get_king_moves(square) & b.pieces(Piece::King))
                | (get_bishop_moves(square, occ) & diag)
                | (get_rook_moves(square, occ) & ortho)
        )
    }

    fn hash(&self) -> u64 { self.board.hash() }

    fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        self.board.piece_on(square).zip(self.board.color_on(square))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_then_undo_restores_hash() {
        let mut pos = Position::startpos();
        let before = pos.hash();
        let mv = pos.find_move_uci("e2e4").expect("e2e4 legal");
        pos.apply_move(&mv).unwrap();
        assert_ne!(pos.hash(), before);
        pos.undo_move().unwrap();
        assert_eq!(pos.hash(), before);
        assert_eq!(pos.undo_move(), Err(RulesError::EmptyHistory));
    }

    #[test]
    fn en_passant_is_annotated_as_capture() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let ep = pos.find_move_uci("e5d6").expect("en passant legal");
        assert_eq!(ep.captured, Some(Piece::Pawn));
        assert_eq!(pos.capture_moves().len(), 1);
    }

    #[test]
    fn castling_prints_king_destination() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let castle = pos.find_move_uci("e1g1").expect("castling legal");
        assert!(castle.castle);
        assert!(castle.captured.is_none());
        assert_eq!(format!("{}", castle), "e1g1");
        assert_eq!(pos.find_move_uci("e1h1"), Some(castle));
    }

    #[test]
    fn attackers_finds_pawn_and_slider() {
        let pos = Position::from_fen("4k3/8/8/2p5/8/8/8/3QK3 w - - 0 1").unwrap();
        let d4: Square = "d4".parse().unwrap();
        let black = pos.attackers(d4, Color::Black);
        assert!(black.has("c5".parse().unwrap()));
        let white = pos.attackers(d4, Color::White);
        assert!(white.has("d1".parse().unwrap()));
    }
}
