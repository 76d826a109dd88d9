pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Returned when the board has no room left to push rows up for incoming garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("board overflowed while injecting garbage")]
pub struct BoardOverflowError;

/// Reason an action was rejected.
///
/// A rejected action never changes the match state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ActionError {
    #[display("piece colliding after action")]
    Collision,
    #[display("hold already used for this piece")]
    HoldUnavailable,
    #[display("match is not in playing state")]
    NotPlaying,
}
