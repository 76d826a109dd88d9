use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::ActionError;

use super::{Action, Match, MatchConfig, MatchEvent, MatchSeed, VersusSnapshot};

/// One of the two players of a versus session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
}

impl Side {
    pub const ALL: [Self; 2] = [Side::Left, Side::Right];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    const fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Receives every event of a versus session, tagged with the side that emitted it.
pub trait VersusListener {
    fn on_event(&mut self, side: Side, event: MatchEvent);
}

impl VersusListener for () {
    fn on_event(&mut self, _side: Side, _event: MatchEvent) {}
}

impl VersusListener for Vec<(Side, MatchEvent)> {
    fn on_event(&mut self, side: Side, event: MatchEvent) {
        self.push((side, event));
    }
}

/// Drives one side of a session, through the same actions a human would use.
pub trait Controller: fmt::Debug {
    /// Called once per tick, before gravity is applied to `game`.
    fn update(&mut self, dt: Duration, game: &mut Match);

    /// Called when the session restarts.
    fn reset(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersusOutcome {
    Winner(Side),
    Draw,
}

/// Two matches exchanging garbage.
///
/// Both matches are created from the same seed, so both players see the same piece
/// sequence. Events are forwarded to the listener as soon as the call producing
/// them returns, and every `GarbageSent` is credited to the opponent's pending
/// garbage at that moment.
///
/// # Example
///
/// ```
/// use duelris_engine::{Action, MatchConfig, MatchEvent, MatchSeed, Side, Versus};
///
/// let events: Vec<(Side, MatchEvent)> = vec![];
/// let mut versus = Versus::new(MatchConfig::default(), MatchSeed::from_u64(7), events);
/// versus.apply(Side::Left, Action::HardDrop).unwrap();
///
/// assert_eq!(versus.listener(), &[(Side::Left, MatchEvent::PieceLocked)]);
/// assert!(versus.outcome().is_none());
/// ```
#[derive(Debug)]
pub struct Versus<L = ()> {
    matches: [Match; 2],
    controllers: [Option<Box<dyn Controller>>; 2],
    listener: L,
}

impl<L> Versus<L>
where
    L: VersusListener,
{
    #[must_use]
    pub fn new(config: MatchConfig, seed: MatchSeed, listener: L) -> Self {
        Self::from_matches(
            Match::new(config.clone(), seed),
            Match::new(config, seed),
            listener,
        )
    }

    /// Builds a session from two prepared matches.
    #[must_use]
    pub fn from_matches(left: Match, right: Match, listener: L) -> Self {
        Self {
            matches: [left, right],
            controllers: [None, None],
            listener,
        }
    }

    /// Hands control of `side` to `controller`.
    #[must_use]
    pub fn with_controller<C>(mut self, side: Side, controller: C) -> Self
    where
        C: Controller + 'static,
    {
        self.controllers[side.index()] = Some(Box::new(controller));
        self
    }

    #[must_use]
    pub fn game(&self, side: Side) -> &Match {
        &self.matches[side.index()]
    }

    #[must_use]
    pub fn is_controlled(&self, side: Side) -> bool {
        self.controllers[side.index()].is_some()
    }

    #[must_use]
    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    #[must_use]
    pub fn into_listener(self) -> L {
        self.listener
    }

    /// Applies a player input to `side`.
    pub fn apply(&mut self, side: Side, action: Action) -> Result<(), ActionError> {
        let result = self.matches[side.index()].apply(action);
        self.pump_events();
        result
    }

    pub fn set_soft_drop(&mut self, side: Side, held: bool) {
        self.matches[side.index()].set_soft_drop(held);
    }

    pub fn toggle_pause(&mut self) {
        for game in &mut self.matches {
            game.toggle_pause();
        }
    }

    /// Advances both sides by `dt`: controllers first, then gravity.
    ///
    /// Does nothing once the session has an outcome.
    pub fn update(&mut self, dt: Duration) {
        for side in Side::ALL {
            if self.outcome().is_some() {
                return;
            }
            let i = side.index();
            if let Some(controller) = &mut self.controllers[i] {
                controller.update(dt, &mut self.matches[i]);
                self.pump_events();
            }
        }
        for side in Side::ALL {
            if self.outcome().is_some() {
                return;
            }
            self.matches[side.index()].update(dt);
            self.pump_events();
        }
    }

    /// Forwards buffered events and routes sent garbage to the opponent.
    fn pump_events(&mut self) {
        for side in Side::ALL {
            for event in self.matches[side.index()].drain_events() {
                if let MatchEvent::GarbageSent { amount } = event {
                    self.matches[side.opponent().index()].receive_garbage(amount);
                }
                self.listener.on_event(side, event);
            }
        }
    }

    /// The winner once a side has topped out.
    #[must_use]
    pub fn outcome(&self) -> Option<VersusOutcome> {
        let [left, right] = &self.matches;
        match (left.state().is_game_over(), right.state().is_game_over()) {
            (false, false) => None,
            (true, false) => Some(VersusOutcome::Winner(Side::Right)),
            (false, true) => Some(VersusOutcome::Winner(Side::Left)),
            (true, true) => Some(VersusOutcome::Draw),
        }
    }

    /// Restarts both matches with their original seed.
    pub fn reset(&mut self) {
        for game in &mut self.matches {
            game.reset();
        }
        for controller in self.controllers.iter_mut().flatten() {
            controller.reset();
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> VersusSnapshot {
        let [left, right] = &self.matches;
        VersusSnapshot {
            left: left.snapshot(),
            right: right.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameOverCause;

    #[derive(Debug)]
    struct DropEveryTick;

    impl Controller for DropEveryTick {
        fn update(&mut self, _dt: Duration, game: &mut Match) {
            game.hard_drop().ok();
        }
    }

    fn versus() -> Versus<Vec<(Side, MatchEvent)>> {
        Versus::new(MatchConfig::default(), MatchSeed::from_u64(11), vec![])
    }

    #[test]
    fn test_both_sides_share_piece_sequence() {
        let versus = versus();
        assert_eq!(
            versus.game(Side::Left).active_piece(),
            versus.game(Side::Right).active_piece()
        );
        assert!(
            versus
                .game(Side::Left)
                .next_pieces()
                .eq(versus.game(Side::Right).next_pieces())
        );
    }

    #[test]
    fn test_events_are_tagged_with_side() {
        let mut versus = versus();
        versus.apply(Side::Right, Action::MoveLeft).unwrap();
        versus.apply(Side::Left, Action::RotateCw).unwrap();
        assert_eq!(
            versus.listener(),
            &[
                (Side::Right, MatchEvent::Moved),
                (Side::Left, MatchEvent::Rotated)
            ]
        );
    }

    #[test]
    fn test_rejected_action_is_returned() {
        let mut versus = versus();
        versus.apply(Side::Left, Action::Hold).unwrap();
        assert_eq!(
            versus.apply(Side::Left, Action::Hold),
            Err(ActionError::HoldUnavailable)
        );
    }

    #[test]
    fn test_controller_drives_its_side() {
        let mut versus = versus().with_controller(Side::Right, DropEveryTick);
        assert!(versus.is_controlled(Side::Right));
        assert!(!versus.is_controlled(Side::Left));

        versus.update(Duration::from_millis(16));
        assert_eq!(versus.game(Side::Right).stats().completed_pieces(), 1);
        assert_eq!(versus.game(Side::Left).stats().completed_pieces(), 0);
    }

    #[test]
    fn test_outcome_after_top_out() {
        let mut versus = versus().with_controller(Side::Left, DropEveryTick);
        for _ in 0..100 {
            versus.update(Duration::from_millis(16));
        }
        assert_eq!(versus.outcome(), Some(VersusOutcome::Winner(Side::Right)));
        assert!(versus.listener().contains(&(
            Side::Left,
            MatchEvent::GameOver {
                cause: GameOverCause::SpawnCollision
            }
        )));

        // Frozen once decided.
        let right = versus.game(Side::Right).snapshot();
        versus.update(Duration::from_secs(5));
        assert_eq!(versus.game(Side::Right).snapshot(), right);

        versus.reset();
        assert_eq!(versus.outcome(), None);
        assert_eq!(versus.game(Side::Left).board().occupied_count(), 0);
    }

    #[test]
    fn test_pause_stops_both_sides() {
        let mut versus = versus();
        versus.toggle_pause();
        assert_eq!(
            versus.apply(Side::Left, Action::MoveLeft),
            Err(ActionError::NotPlaying)
        );
        versus.update(Duration::from_secs(5));
        assert_eq!(versus.game(Side::Right).active_piece().y(), 0);
    }
}
