//! Match rules and versus sessions.
//!
//! - [`Match`] - One player's game: board, falling piece, queue, hold and garbage
//! - [`Versus`] - Two matches exchanging garbage, optionally driven by [`Controller`]s
//! - [`PieceQueue`] - 7-bag piece generation
//! - [`MatchSeed`] - Seed for deterministic piece and garbage generation
//! - [`MatchStats`] - Score, level, line clear and garbage counters
//! - [`MatchEvent`] - Notable transitions, for sound and side effects
//!
//! # Game Flow
//!
//! 1. A piece spawns centered on the top row
//! 2. The player (or AI) moves, rotates or holds it through [`Action`]s
//! 3. Gravity from [`Match::update`], a soft drop or a hard drop lowers it
//! 4. When it cannot move down it locks: full rows clear, garbage is sent to the
//!    opponent, pending garbage is injected, and the next piece spawns
//! 5. The match ends when a piece cannot spawn or garbage cannot fit
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use duelris_engine::{Action, MatchConfig, MatchSeed, Side, Versus};
//!
//! let mut versus = Versus::new(MatchConfig::default(), MatchSeed::from_u64(1), ());
//!
//! versus.apply(Side::Left, Action::MoveRight).ok();
//! versus.apply(Side::Left, Action::HardDrop).ok();
//!
//! for _ in 0..60 {
//!     versus.update(Duration::from_millis(16));
//! }
//! assert!(versus.outcome().is_none());
//! ```

pub use self::{
    action::*, config::*, event::*, match_engine::*, match_stats::*, piece_queue::*,
    snapshot::*, versus::*,
};

mod action;
mod config;
mod event;
mod match_engine;
mod match_stats;
mod piece_queue;
mod snapshot;
mod versus;
