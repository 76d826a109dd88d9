use serde::{Deserialize, Serialize};

/// Notable transition of a [`Match`](super::Match), for sound and side effects.
///
/// Events are buffered by the match in the order they happen and handed out by
/// [`Match::drain_events`](super::Match::drain_events).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    Moved,
    Rotated,
    Held,
    PieceLocked,
    LinesCleared { count: usize },
    GarbageSent { amount: usize },
    GarbageApplied { amount: usize },
    GameOver { cause: GameOverCause },
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum GameOverCause {
    /// A new piece collided with the board at its spawn position.
    #[display("spawn collision")]
    SpawnCollision,
    /// Incoming garbage had no room to push the stack up.
    #[display("garbage overflow")]
    GarbageOverflow,
}
