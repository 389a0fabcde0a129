//! Rules-engine seam. The search core only talks to a position through the
//! [`Rules`] trait; [`cozy::Position`] is the concrete implementation.

pub mod cozy;

use cozy_chess::{BitBoard, Color, File, Piece, Square};
use std::fmt;
use std::ops::{Deref, DerefMut};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("undo requested with no move applied")]
    EmptyHistory,
    #[error("FEN error: {0}")]
    Fen(String),
}

/// A legal move annotated with the metadata the evaluator and orderer need.
///
/// Castling keeps the king-takes-rook encoding of the move generator in `to`;
/// `Display` prints the conventional king destination instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<Piece>,
    pub gives_check: bool,
    pub castle: bool,
}

impl Move {
    pub fn is_capture(&self) -> bool { self.captured.is_some() }

    pub fn to_cozy(&self) -> cozy_chess::Move {
        cozy_chess::Move { from: self.from, to: self.to, promotion: self.promotion }
    }

    /// Destination as a player would name it (g/c file for castling).
    pub fn king_destination(&self) -> Square {
        if !self.castle { return self.to; }
        let file = if self.to.file() as u8 > self.from.file() as u8 { File::G } else { File::C };
        Square::new(file, self.from.rank())
    }
}

pub(crate) fn piece_char(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.king_destination())?;
        if let Some(p) = self.promotion { write!(f, "{}", piece_char(p))?; }
        Ok(())
    }
}

/// Collaborator contract consumed by the search core.
pub trait Rules {
    /// Every legal move for the side to move, fully annotated.
    fn legal_moves(&self) -> Vec<Move>;
    fn apply_move(&mut self, mv: &Move) -> Result<(), RulesError>;
    /// Reverts exactly the most recently applied move.
    fn undo_move(&mut self) -> Result<(), RulesError>;
    fn side_to_move(&self) -> Color;
    fn in_check(&self) -> bool;
    fn piece_squares(&self, piece: Piece, color: Color) -> BitBoard;
    /// Squares holding pieces of `color` that attack `square`.
    fn attackers(&self, square: Square, color: Color) -> BitBoard;
    fn hash(&self) -> u64;
    fn piece_at(&self, square: Square) -> Option<(Piece, Color)>;

    fn capture_moves(&self) -> Vec<Move> {
        self.legal_moves().into_iter().filter(Move::is_capture).collect()
    }
}

/// Applies a move on construction and undoes it when dropped, so every exit
/// path of a search frame restores the position.
pub struct MoveGuard<'a, R: Rules + ?Sized> {
    pos: &'a mut R,
}

impl<'a, R: Rules + ?Sized> MoveGuard<'a, R> {
    pub fn apply(pos: &'a mut R, mv: &Move) -> Result<Self, RulesError> {
        pos.apply_move(mv)?;
        Ok(Self { pos })
    }
}

impl<R: Rules + ?Sized> Deref for MoveGuard<'_, R> {
    type Target = R;
    fn deref(&self) -> &R { self.pos }
}

impl<R: Rules + ?Sized> DerefMut for MoveGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R { self.pos }
}

impl<R: Rules + ?Sized> Drop for MoveGuard<'_, R> {
    fn drop(&mut self) {
        if let Err(err) = self.pos.undo_move() {
            // A guard always owns exactly one applied move; failing here means
            // the move stack was corrupted underneath it.
            if !std::thread::panicking() {
                panic!("move guard could not restore position: {err}");
            }
        }
    }
}
