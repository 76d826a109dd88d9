//! Placement search for the falling piece.
//!
//! For each of the four rotation states and every column from `-(N - 1)` to the
//! rightmost one (`N` being the shape size), the piece is put on its current row,
//! skipped if it collides there, and dropped straight down. The board it leaves is
//! scored, noise is added, and the strictly best candidate is kept, so the first
//! candidate in enumeration order wins ties.
//!
//! Reachability is not checked: a placement is only as good as the rotations and
//! moves that lead to it.

use arrayvec::ArrayVec;
use duelris_engine::{Action, BOARD_WIDTH, Board, Piece, PieceRotation};
use rand::Rng;

use crate::{
    board_analysis::BoardAnalysis,
    config::AiConfig,
    difficulty::Difficulty,
    placement_evaluator::{HeuristicEvaluator, PanicEvaluator, PlacementEvaluator},
};

const MAX_SHIFT: usize = BOARD_WIDTH + 3;
const MAX_ACTIONS: usize = 3 + MAX_SHIFT + 1;

/// Actions leading to a placement, in the order they must be applied.
pub type ActionSequence = ArrayVec<Action, MAX_ACTIONS>;

/// A chosen landing position for the falling piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    target: Piece,
    score: f32,
    panic: bool,
}

impl Placement {
    /// The piece at its landing position.
    #[must_use]
    pub fn target(&self) -> &Piece {
        &self.target
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.target.rotation()
    }

    #[must_use]
    pub fn column(&self) -> i32 {
        self.target.x()
    }

    /// Evaluation score plus noise.
    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Whether the panic evaluation chose this placement.
    #[must_use]
    pub fn is_panic(&self) -> bool {
        self.panic
    }

    /// Clockwise rotations, then horizontal moves, then a single drop action.
    ///
    /// ```
    /// use duelris_ai::planner::Planner;
    /// use duelris_engine::{Action, Board, Piece, PieceKind};
    ///
    /// let board = Board::new();
    /// let piece = Piece::new(PieceKind::O);
    /// let placement = Planner::default().plan(&board, &piece, &mut rand::rng()).unwrap();
    ///
    /// let actions = placement.actions(&piece, true);
    /// assert_eq!(actions.last(), Some(&Action::HardDrop));
    /// ```
    #[must_use]
    pub fn actions(&self, from: &Piece, hard_drop: bool) -> ActionSequence {
        let mut actions = ActionSequence::new();
        for _ in 0..from.rotation().clockwise_steps_to(self.target.rotation()) {
            actions.push(Action::RotateCw);
        }
        let dx = self.target.x() - from.x();
        let moves = usize::try_from(dx.unsigned_abs())
            .unwrap_or(MAX_SHIFT)
            .min(MAX_SHIFT);
        for _ in 0..moves {
            actions.push(Action::horizontal(dx));
        }
        actions.push(if hard_drop {
            Action::HardDrop
        } else {
            Action::SoftDrop
        });
        actions
    }
}

/// Selects where to put the falling piece.
#[derive(Debug)]
pub struct Planner {
    normal: Box<dyn PlacementEvaluator>,
    panic: Box<dyn PlacementEvaluator>,
    panic_margin_rows: usize,
    noise_scale: f32,
    noise_amplitude: f32,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(
            Box::new(HeuristicEvaluator::default()),
            Box::new(PanicEvaluator::default()),
        )
    }
}

impl Planner {
    /// Creates a noiseless planner with a panic margin of 4 rows.
    #[must_use]
    pub fn new(normal: Box<dyn PlacementEvaluator>, panic: Box<dyn PlacementEvaluator>) -> Self {
        Self {
            normal,
            panic,
            panic_margin_rows: 4,
            noise_scale: 0.0,
            noise_amplitude: 0.0,
        }
    }

    #[must_use]
    pub fn from_config(config: &AiConfig) -> Self {
        let difficulty = Difficulty::new(config);
        Self::new(
            Box::new(HeuristicEvaluator::new(config.weights)),
            Box::new(PanicEvaluator::new(config.panic_weights)),
        )
        .with_panic_margin(config.panic_margin_rows)
        .with_noise(difficulty.noise_scale(), config.noise_amplitude)
    }

    #[must_use]
    pub fn with_panic_margin(mut self, rows: usize) -> Self {
        self.panic_margin_rows = rows;
        self
    }

    /// Adds `scale * U(-amplitude, amplitude)` to every candidate score.
    #[must_use]
    pub fn with_noise(mut self, scale: f32, amplitude: f32) -> Self {
        self.noise_scale = scale;
        self.noise_amplitude = amplitude;
        self
    }

    /// Whether the stack is close enough to the ceiling to use the panic evaluation.
    #[must_use]
    pub fn is_panic(&self, board: &Board) -> bool {
        board
            .top_occupied_row()
            .is_some_and(|top| top < self.panic_margin_rows)
    }

    /// Returns the best placement for `piece`, or `None` if it fits nowhere.
    pub fn plan<R>(&self, board: &Board, piece: &Piece, rng: &mut R) -> Option<Placement>
    where
        R: Rng + ?Sized,
    {
        let panic = self.is_panic(board);
        let evaluator = if panic { &*self.panic } else { &*self.normal };

        let mut best: Option<Placement> = None;
        for target in candidates(board, piece) {
            let analysis = BoardAnalysis::from_placement(board, &target);
            let score = evaluator.evaluate_placement(&analysis) + self.noise(rng);
            if best.as_ref().is_none_or(|best| score > best.score) {
                best = Some(Placement {
                    target,
                    score,
                    panic,
                });
            }
        }
        best
    }

    fn noise<R>(&self, rng: &mut R) -> f32
    where
        R: Rng + ?Sized,
    {
        if self.noise_scale <= 0.0 || self.noise_amplitude <= 0.0 {
            return 0.0;
        }
        self.noise_scale * rng.random_range(-self.noise_amplitude..self.noise_amplitude)
    }
}

/// Landing positions in enumeration order: rotation first, then column.
#[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
fn candidates<'a>(board: &'a Board, piece: &'a Piece) -> impl Iterator<Item = Piece> + 'a {
    let size = piece.shape().size() as i32;
    let columns = -(size - 1)..BOARD_WIDTH as i32;
    PieceRotation::ALL
        .into_iter()
        .flat_map(move |rotation| {
            let rotated = piece.with_rotation(rotation);
            columns
                .clone()
                .map(move |x| rotated.with_position(x, piece.y()))
        })
        .filter(move |start| !board.collides(start))
        .map(move |start| start.dropped(board))
}
