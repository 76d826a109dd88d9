use std::{mem, time::Duration};

use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{ActionError, Board, Piece, PieceKind, RotationDirection};

use super::{
    Action, DropOutcome, GameOverCause, MoveDirection, MatchConfig, MatchEvent, MatchSeed, MatchSnapshot,
    MatchStats, PieceQueue,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    Playing,
    Paused,
    GameOver(GameOverCause),
}

/// One player's game: board, falling piece, queue, hold slot and incoming garbage.
///
/// Spawning and locking happen inside the call that triggers them, so the only
/// observable states are [`MatchState::Playing`], [`MatchState::Paused`] and the
/// terminal [`MatchState::GameOver`]. Actions rejected by the rules return an
/// [`ActionError`] and leave the match untouched.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use duelris_engine::{Action, Match, MatchConfig, MatchEvent, MatchSeed};
///
/// let mut game = Match::new(MatchConfig::default(), MatchSeed::from_u64(1));
/// game.apply(Action::MoveLeft).unwrap();
/// game.apply(Action::HardDrop).unwrap();
/// game.update(Duration::from_millis(16));
///
/// let events = game.drain_events();
/// assert_eq!(events, [MatchEvent::Moved, MatchEvent::PieceLocked]);
/// assert_eq!(game.stats().completed_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Match {
    config: MatchConfig,
    seed: MatchSeed,
    initial_board: Board,
    board: Board,
    active: Piece,
    queue: PieceQueue,
    held: Option<PieceKind>,
    can_hold: bool,
    pending_garbage: usize,
    garbage_rng: Pcg32,
    drop_timer: Duration,
    soft_drop: bool,
    elapsed: Duration,
    stats: MatchStats,
    state: MatchState,
    events: Vec<MatchEvent>,
}

impl Match {
    /// Starts a match and spawns its first piece.
    ///
    /// Matches created from the same seed and config see the same pieces and garbage gaps.
    #[must_use]
    pub fn new(config: MatchConfig, seed: MatchSeed) -> Self {
        Self::with_board(config, seed, Board::new())
    }

    /// Starts a match on a prepared board.
    ///
    /// The match is over right away if the first piece collides with `board`.
    #[must_use]
    pub fn with_board(config: MatchConfig, seed: MatchSeed, board: Board) -> Self {
        let mut root = Pcg32::from_seed(*seed.as_bytes());
        let queue = PieceQueue::with_rng(Pcg32::from_rng(&mut root), config.preview_len);
        let garbage_rng = Pcg32::from_rng(&mut root);
        let mut this = Self {
            config,
            seed,
            initial_board: board.clone(),
            board,
            active: Piece::new(PieceKind::I),
            queue,
            held: None,
            can_hold: true,
            pending_garbage: 0,
            garbage_rng,
            drop_timer: Duration::ZERO,
            soft_drop: false,
            elapsed: Duration::ZERO,
            stats: MatchStats::new(),
            state: MatchState::Playing,
            events: vec![],
        };
        this.spawn_piece();
        this
    }

    /// Restarts from the starting board with the same seed and config.
    pub fn reset(&mut self) {
        *self = Self::with_board(self.config.clone(), self.seed, self.initial_board.clone());
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> MatchSeed {
        self.seed
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> &Piece {
        &self.active
    }

    /// Where the active piece would land on a hard drop.
    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        self.active.dropped(&self.board)
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.preview()
    }

    /// Garbage rows received but not yet injected.
    #[must_use]
    pub fn pending_garbage(&self) -> usize {
        self.pending_garbage
    }

    #[must_use]
    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Time spent in the playing state.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn is_soft_drop_held(&self) -> bool {
        self.soft_drop
    }

    /// Gravity interval at the current level, shortened while soft drop is held.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        let interval = self.config.gravity.drop_interval(self.stats.level());
        if self.soft_drop {
            interval / self.config.soft_drop_factor.max(1)
        } else {
            interval
        }
    }

    /// Takes the events buffered since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        mem::take(&mut self.events)
    }

    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            board: self.board.clone(),
            active: self.active,
            ghost: self.ghost_piece(),
            hold: self.held,
            can_hold: self.can_hold,
            next: self.next_pieces().collect(),
            pending_garbage: self.pending_garbage,
            stats: self.stats.clone(),
            state: self.state,
            elapsed_ms: self.elapsed.as_millis(),
        }
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            MatchState::Playing => MatchState::Paused,
            MatchState::Paused => MatchState::Playing,
            MatchState::GameOver(cause) => MatchState::GameOver(cause),
        };
    }

    /// Advances gravity by `dt`.
    ///
    /// When the accumulated time exceeds [`Self::drop_interval`], the piece falls one
    /// row (or locks) and the accumulator restarts from zero.
    pub fn update(&mut self, dt: Duration) {
        if !self.state.is_playing() {
            return;
        }
        self.elapsed += dt;
        self.drop_timer += dt;
        if self.drop_timer > self.drop_interval() {
            self.gravity_step();
        }
    }

    pub fn set_soft_drop(&mut self, held: bool) {
        self.soft_drop = held;
    }

    /// Dispatches a discrete input to the matching operation.
    pub fn apply(&mut self, action: Action) -> Result<(), ActionError> {
        match action {
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::RotateCw => self.rotate_cw(),
            Action::RotateCcw => self.rotate_ccw(),
            Action::SoftDrop => self.soft_drop_step().map(|_| ()),
            Action::HardDrop => self.hard_drop(),
            Action::Hold => self.hold(),
        }
    }

    /// Replaces the active piece with the next one from the queue.
    ///
    /// Ends the match if the new piece collides at its spawn position. Does nothing
    /// once the match is over.
    pub fn spawn_piece(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        let kind = self.queue.pop_next();
        self.spawn_kind(kind);
        self.can_hold = true;
    }

    fn spawn_kind(&mut self, kind: PieceKind) {
        self.active = Piece::new(kind);
        self.drop_timer = Duration::ZERO;
        if self.board.collides(&self.active) {
            self.finish(GameOverCause::SpawnCollision);
        }
    }

    pub fn move_left(&mut self) -> Result<(), ActionError> {
        self.move_horizontal(MoveDirection::Left)
    }

    pub fn move_right(&mut self) -> Result<(), ActionError> {
        self.move_horizontal(MoveDirection::Right)
    }

    /// Shifts the active piece one column.
    pub fn move_horizontal(&mut self, direction: MoveDirection) -> Result<(), ActionError> {
        self.ensure_playing()?;
        let moved = self.active.moved(direction.dx(), 0);
        if self.board.collides(&moved) {
            return Err(ActionError::Collision);
        }
        self.active = moved;
        self.events.push(MatchEvent::Moved);
        Ok(())
    }

    pub fn rotate_cw(&mut self) -> Result<(), ActionError> {
        self.rotate(RotationDirection::Clockwise)
    }

    pub fn rotate_ccw(&mut self) -> Result<(), ActionError> {
        self.rotate(RotationDirection::CounterClockwise)
    }

    /// Rotates the active piece with wall kicks.
    pub fn rotate(&mut self, direction: RotationDirection) -> Result<(), ActionError> {
        self.ensure_playing()?;
        self.active = self
            .active
            .try_rotated(direction, &self.board)
            .ok_or(ActionError::Collision)?;
        self.events.push(MatchEvent::Rotated);
        Ok(())
    }

    /// Moves the active piece down one row, locking it if it cannot move.
    pub fn soft_drop_step(&mut self) -> Result<DropOutcome, ActionError> {
        self.ensure_playing()?;
        Ok(self.gravity_step())
    }

    /// Drops the active piece to the bottom and locks it.
    pub fn hard_drop(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        while self.gravity_step().is_moved() {}
        Ok(())
    }

    /// Swaps the active piece with the hold slot, once per spawned piece.
    ///
    /// With an empty slot the next queued piece is spawned instead. The swapped-in
    /// piece starts over at its spawn position and rotation.
    pub fn hold(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        if !self.can_hold {
            return Err(ActionError::HoldUnavailable);
        }
        self.events.push(MatchEvent::Held);
        match self.held.replace(self.active.kind()) {
            Some(kind) => self.spawn_kind(kind),
            None => self.spawn_piece(),
        }
        self.can_hold = false;
        Ok(())
    }

    /// Queues garbage rows to be injected at this match's next lock.
    pub fn receive_garbage(&mut self, amount: usize) {
        self.pending_garbage = self.pending_garbage.saturating_add(amount);
    }

    fn ensure_playing(&self) -> Result<(), ActionError> {
        if self.state.is_playing() {
            Ok(())
        } else {
            Err(ActionError::NotPlaying)
        }
    }

    fn gravity_step(&mut self) -> DropOutcome {
        self.drop_timer = Duration::ZERO;
        let lowered = self.active.moved(0, 1);
        if !self.board.collides(&lowered) {
            self.active = lowered;
            return DropOutcome::Moved;
        }
        self.board.merge(&self.active);
        self.process_lock();
        DropOutcome::Locked
    }

    /// Clears rows, sends garbage, takes pending garbage, then spawns.
    ///
    /// Own clears always resolve before incoming garbage lands.
    fn process_lock(&mut self) {
        let cleared = self.board.clear_full_rows();
        self.stats.complete_piece_drop(cleared);
        self.events.push(MatchEvent::PieceLocked);
        if cleared > 0 {
            self.events.push(MatchEvent::LinesCleared { count: cleared });
        }

        let sent = self.config.garbage_for_lines(cleared);
        if sent > 0 {
            self.stats.record_garbage_sent(sent);
            self.events.push(MatchEvent::GarbageSent { amount: sent });
        }

        let incoming = mem::take(&mut self.pending_garbage);
        if incoming > 0 {
            self.stats.record_garbage_received(incoming);
            let result = self.board.inject_garbage(incoming, &mut self.garbage_rng);
            self.events.push(MatchEvent::GarbageApplied { amount: incoming });
            if result.is_err() {
                self.finish(GameOverCause::GarbageOverflow);
                return;
            }
        }

        self.spawn_piece();
    }

    fn finish(&mut self, cause: GameOverCause) {
        self.state = MatchState::GameOver(cause);
        self.events.push(MatchEvent::GameOver { cause });
    }
}
