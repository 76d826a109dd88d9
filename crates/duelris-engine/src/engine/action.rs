use serde::{Deserialize, Serialize};

/// A discrete input, shared by human players and the AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    /// One gravity step, locking the piece if it cannot move down.
    SoftDrop,
    HardDrop,
    Hold,
}

impl Action {
    /// Horizontal move for a column delta sign.
    #[must_use]
    pub fn horizontal(dx: i32) -> Self {
        if dx < 0 { Self::MoveLeft } else { Self::MoveRight }
    }
}

/// Direction of a one-column shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Left,
    Right,
}

impl MoveDirection {
    #[must_use]
    pub const fn dx(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// Result of a single gravity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece moved down one row.
    Moved,
    /// The piece could not move and was locked into the board.
    Locked,
}
