use serde::Serialize;

/// Score values for line clears, indexed by lines cleared at once.
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Per-match statistics.
///
/// - **Score**: points earned from line clears (no combo, back-to-back or T-spin bonuses)
/// - **Level**: one level per 10 cleared lines
/// - **Line clear distribution**: count of single, double, triple and quad clears
/// - **Garbage**: rows sent to and received from the opponent
///
/// # Example
///
/// ```
/// use duelris_engine::MatchStats;
///
/// let mut stats = MatchStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    score: usize,
    level: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
    garbage_sent: usize,
    garbage_received: usize,
}

impl Default for MatchStats {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
            garbage_sent: 0,
            garbage_received: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Current level, `total_cleared_lines / 10`.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Number of pieces locked into the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of locks by lines cleared; index `0` counts locks without a clear.
    ///
    /// Clears of more than four rows are counted in the last slot.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    #[must_use]
    pub const fn garbage_sent(&self) -> usize {
        self.garbage_sent
    }

    #[must_use]
    pub const fn garbage_received(&self) -> usize {
        self.garbage_received
    }

    /// Records a locked piece and the lines it cleared.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        let slot = cleared_lines.min(SCORE_TABLE.len() - 1);
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        self.line_cleared_counter[slot] += 1;
        self.score += SCORE_TABLE[slot];
        self.level = self.total_cleared_lines / 10;
    }

    pub fn record_garbage_sent(&mut self, amount: usize) {
        self.garbage_sent += amount;
    }

    pub fn record_garbage_received(&mut self, amount: usize) {
        self.garbage_received += amount;
    }
}
