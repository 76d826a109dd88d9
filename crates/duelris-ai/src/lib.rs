//! Heuristic AI opponent for duelris matches.
//!
//! The AI plays through the same [`Action`](duelris_engine::Action)s a human uses and reads
//! nothing but the board and the falling piece.
//!
//! # Architecture
//!
//! ```text
//! AiPlayer (think timer, queued actions)
//!     ↓ uses
//! Planner (enumerate placements, add noise, keep the best)
//!     ↓ uses
//! PlacementEvaluator (score the board after one placement)
//!     ↓ uses
//! BoardAnalysis (height, holes, full lines)
//! ```
//!
//! [`Difficulty`](difficulty::Difficulty) derives think delay, noise and drop style from a
//! level between 1 and 10.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use duelris_ai::{ai_player::AiPlayer, config::AiConfig};
//! use duelris_engine::{Match, MatchConfig, MatchSeed};
//!
//! let mut game = Match::new(MatchConfig::default(), MatchSeed::from_u64(3));
//! let mut ai = AiPlayer::new(AiConfig::with_level(10), MatchSeed::from_u64(4));
//!
//! for _ in 0..200 {
//!     ai.update(Duration::from_millis(60), &mut game);
//!     game.update(Duration::from_millis(60));
//! }
//! assert!(game.stats().completed_pieces() > 0);
//! ```

pub mod ai_player;
pub mod board_analysis;
pub mod config;
pub mod difficulty;
pub mod placement_evaluator;
pub mod planner;
