use std::{collections::VecDeque, time::Duration};

use duelris_engine::{Action, Controller, Match, MatchSeed};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::{config::AiConfig, difficulty::Difficulty, planner::Planner};

/// AI opponent playing one match through discrete actions.
///
/// A think timer limits how often the AI acts. Each time the timer exceeds the
/// difficulty's think delay, the AI applies the next queued action, or plans a new
/// placement when the queue is empty. Queued actions are dropped once a piece locks,
/// since they were computed for the previous piece.
#[derive(Debug)]
pub struct AiPlayer {
    planner: Planner,
    difficulty: Difficulty,
    rng: Pcg32,
    seed: MatchSeed,
    think_timer: Duration,
    queue: VecDeque<Action>,
    planned_for: Option<usize>,
}

impl AiPlayer {
    /// `seed` drives the noise added to placement scores.
    #[must_use]
    pub fn new(config: AiConfig, seed: MatchSeed) -> Self {
        Self {
            planner: Planner::from_config(&config),
            difficulty: Difficulty::new(&config),
            rng: Pcg32::from_seed(*seed.as_bytes()),
            seed,
            think_timer: Duration::ZERO,
            queue: VecDeque::new(),
            planned_for: None,
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    #[must_use]
    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Actions planned but not yet applied.
    pub fn queued_actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.queue.iter().copied()
    }

    /// Advances the think timer and acts at most once.
    pub fn update(&mut self, dt: Duration, game: &mut Match) {
        if !game.state().is_playing() {
            return;
        }
        self.think_timer += dt;
        if self.think_timer <= self.difficulty.think_delay() {
            return;
        }
        self.think_timer = Duration::ZERO;

        let locked = game.stats().completed_pieces();
        if self.planned_for != Some(locked) {
            self.queue.clear();
        }
        match self.queue.pop_front() {
            // A rejected action means the board changed under the plan; the next
            // actions still run and the piece is re-planned after it locks.
            Some(action) => {
                game.apply(action).ok();
            }
            None => self.plan(game),
        }
    }

    fn plan(&mut self, game: &Match) {
        let piece = game.active_piece();
        let Some(placement) = self.planner.plan(game.board(), piece, &mut self.rng) else {
            return;
        };
        let hard_drop = self.difficulty.hard_drop(placement.is_panic());
        self.queue.extend(placement.actions(piece, hard_drop));
        self.planned_for = Some(game.stats().completed_pieces());
    }

    /// Clears the plan and timer, and restarts the noise sequence.
    pub fn reset(&mut self) {
        self.rng = Pcg32::from_seed(*self.seed.as_bytes());
        self.think_timer = Duration::ZERO;
        self.queue.clear();
        self.planned_for = None;
    }
}

impl Controller for AiPlayer {
    fn update(&mut self, dt: Duration, game: &mut Match) {
        AiPlayer::update(self, dt, game);
    }

    fn reset(&mut self) {
        AiPlayer::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use duelris_engine::{MatchConfig, MatchEvent};

    use super::*;

    fn setup(level: u8) -> (AiPlayer, Match) {
        let game = Match::new(MatchConfig::default(), MatchSeed::from_u64(21));
        let ai = AiPlayer::new(AiConfig::with_level(level), MatchSeed::from_u64(22));
        (ai, game)
    }

    #[test]
    fn test_waits_for_think_delay() {
        let (mut ai, mut game) = setup(10);
        ai.update(Duration::from_millis(50), &mut game);
        assert_eq!(ai.queued_actions().count(), 0);

        // First decision plans without acting.
        ai.update(Duration::from_millis(1), &mut game);
        let planned: Vec<_> = ai.queued_actions().collect();
        assert!(!planned.is_empty());
        assert_eq!(planned.last(), Some(&Action::HardDrop));
        assert!(game.drain_events().is_empty());

        // Later decisions apply one action each.
        ai.update(Duration::from_millis(51), &mut game);
        assert_eq!(ai.queued_actions().count(), planned.len() - 1);
    }

    #[test]
    fn test_executes_plan_until_lock() {
        let (mut ai, mut game) = setup(10);
        for _ in 0..20 {
            ai.update(Duration::from_millis(60), &mut game);
            if game.stats().completed_pieces() > 0 {
                break;
            }
        }
        assert_eq!(game.stats().completed_pieces(), 1);
        assert!(game.drain_events().contains(&MatchEvent::PieceLocked));
    }

    #[test]
    fn test_low_level_soft_drops() {
        let (mut ai, mut game) = setup(1);
        ai.update(Duration::from_millis(501), &mut game);
        assert_eq!(ai.queued_actions().last(), Some(Action::SoftDrop));
    }

    #[test]
    fn test_stale_plan_is_discarded() {
        let (mut ai, mut game) = setup(10);
        ai.update(Duration::from_millis(51), &mut game);
        assert!(ai.queued_actions().count() > 0);

        game.hard_drop().unwrap();
        let piece = *game.active_piece();
        ai.update(Duration::from_millis(51), &mut game);

        // The old plan was dropped and a new one made for the new piece.
        assert_eq!(*game.active_piece(), piece);
        assert!(ai.queued_actions().count() > 0);
        assert_eq!(ai.planned_for, Some(1));
    }

    #[test]
    fn test_idle_when_not_playing() {
        let (mut ai, mut game) = setup(10);
        game.toggle_pause();
        ai.update(Duration::from_secs(1), &mut game);
        assert_eq!(ai.queued_actions().count(), 0);
    }

    #[test]
    fn test_reset_restarts_noise() {
        let (mut ai, game) = setup(1);
        let first = ai.planner.plan(game.board(), game.active_piece(), &mut ai.rng);
        ai.reset();
        let second = ai.planner.plan(game.board(), game.active_piece(), &mut ai.rng);
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
