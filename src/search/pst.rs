use cozy_chess::{Color, Piece, Square};
use serde::{Deserialize, Serialize};

// Tables are written as seen from White: first row is rank 8, last row rank 1.
// Units are tenths of a pawn; the evaluator scales them by 10.

#[rustfmt::skip]
const PAWN: [i8; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5,  5,  5,  5,  5,  5,  5,  5,
     1,  1,  2,  3,  3,  2,  1,  1,
     0,  0,  1,  2,  2,  1,  0,  0,
     0,  0,  0,  2,  2,  0,  0,  0,
     1, -1, -1,  0,  0, -1, -1,  1,
     1,  1,  1, -2, -2,  1,  1,  1,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT: [i8; 64] = [
    -5, -4, -3, -3, -3, -3, -4, -5,
    -4, -2,  0,  0,  0,  0, -2, -4,
    -3,  0,  1,  2,  2,  1,  0, -3,
    -3,  1,  2,  2,  2,  2,  1, -3,
    -3,  0,  2,  2,  2,  2,  0, -3,
    -3,  1,  1,  2,  2,  1,  1, -3,
    -4, -2,  0,  1,  1,  0, -2, -4,
    -5, -4, -3, -3, -3, -3, -4, -5,
];

#[rustfmt::skip]
const BISHOP: [i8; 64] = [
    -2, -1, -1, -1, -1, -1, -1, -2,
    -1,  0,  0,  0,  0,  0,  0, -1,
    -1,  0,  1,  1,  1,  1,  0, -1,
    -1,  1,  1,  1,  1,  1,  1, -1,
    -1,  0,  1,  1,  1,  1,  0, -1,
    -1,  1,  1,  1,  1,  1,  1, -1,
    -1,  1,  0,  0,  0,  0,  1, -1,
    -2, -1, -1, -1, -1, -1, -1, -2,
];

#[rustfmt::skip]
const ROOK: [i8; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     1,  1,  1,  1,  1,  1,  1,  1,
    -1,  0,  0,  0,  0,  0,  0, -1,
    -1,  0,  0,  0,  0,  0,  0, -1,
    -1,  0,  0,  0,  0,  0,  0, -1,
    -1,  0,  0,  0,  0,  0,  0, -1,
    -1,  0,  0,  0,  0,  0,  0, -1,
     0,  0,  0,  1,  1,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN: [i8; 64] = [
    -2, -1, -1, -1, -1, -1, -1, -2,
    -1,  0,  0,  0,  0,  0,  0, -1,
    -1,  0,  1,  1,  1,  1,  0, -1,
    -1,  0,  1,  1,  1,  1,  0, -1,
    -1,  0,  1,  1,  1,  1,  0, -1,
    -1,  0,  1,  1,  1,  1,  0, -1,
    -1,  0,  0,  0,  0,  0,  0, -1,
    -2, -1, -1, -1, -1, -1, -1, -2,
];

#[rustfmt::skip]
const KING: [i8; 64] = [
    -3, -4, -4, -5, -5, -4, -4, -3,
    -3, -4, -4, -5, -5, -4, -4, -3,
    -3, -4, -4, -5, -5, -4, -4, -3,
    -3, -4, -4, -5, -5, -4, -4, -3,
    -2, -3, -3, -4, -4, -3, -3, -2,
    -1, -2, -2, -2, -2, -2, -2, -1,
     2,  2,  0,  0,  0,  0,  2,  2,
     2,  3,  1,  0,  0,  1,  3,  2,
];

/// How Black reads the White-oriented tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PstOrientation {
    /// Black's squares are reflected across the board's horizontal axis.
    #[default]
    Mirrored,
    /// Both colors index the same table cell for a square (no reflection).
    Shared,
}

fn table(piece: Piece) -> &'static [i8; 64] {
    match piece {
        Piece::Pawn => &PAWN,
        Piece::Knight => &KNIGHT,
        Piece::Bishop => &BISHOP,
        Piece::Rook => &ROOK,
        Piece::Queen => &QUEEN,
        Piece::King => &KING,
    }
}

/// Raw table value (tenths of a pawn) for `piece` of `color` on `sq`.
pub fn value(piece: Piece, color: Color, sq: Square, orientation: PstOrientation) -> i32 {
    let file = sq.file() as usize;
    let rank = sq.rank() as usize;
    let row = match (color, orientation) {
        (Color::Black, PstOrientation::Mirrored) => rank,
        _ => 7 - rank,
    };
    table(piece)[row * 8 + file] as i32
}
