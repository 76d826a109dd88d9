//! Board, pieces and rotation rules.
//!
//! Coordinates are `(x, y)` with `x` growing rightward over `0..BOARD_WIDTH` and `y`
//! growing downward over `0..BOARD_HEIGHT`. Row `0` is the top of the board; pieces
//! may sit at negative rows while spawning or kicking.

pub use self::{board::*, kick::*, piece::*};

pub(crate) mod board;
pub(crate) mod kick;
pub(crate) mod piece;

/// Number of columns of the board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows of the board.
pub const BOARD_HEIGHT: usize = 20;
