use serde::Serialize;

use crate::{Board, Piece, PieceKind};

use super::{MatchState, MatchStats};

/// Read-only view of a match for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSnapshot {
    pub board: Board,
    pub active: Piece,
    /// Landing position of the active piece.
    pub ghost: Piece,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub next: Vec<PieceKind>,
    pub pending_garbage: usize,
    pub stats: MatchStats,
    pub state: MatchState,
    pub elapsed_ms: u128,
}

/// Both sides of a versus session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersusSnapshot {
    pub left: MatchSnapshot,
    pub right: MatchSnapshot,
}
