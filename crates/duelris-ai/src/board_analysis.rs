use duelris_engine::{BOARD_HEIGHT, Board, Piece};

/// Metrics of a board used to score placements.
///
/// Full rows are counted as they are, before any clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardAnalysis {
    height: usize,
    holes: usize,
    full_lines: usize,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let height = board
            .top_occupied_row()
            .map_or(0, |top| BOARD_HEIGHT - top);
        let full_lines = (0..BOARD_HEIGHT).filter(|&y| board.is_row_full(y)).count();

        let mut covered = [false; Board::WIDTH];
        let mut holes = 0;
        for row in board.rows() {
            for (cell, covered) in row.iter().zip(&mut covered) {
                if !cell.is_empty() {
                    *covered = true;
                } else if *covered {
                    holes += 1;
                }
            }
        }

        Self {
            height,
            holes,
            full_lines,
        }
    }

    /// Analyzes `board` after merging `placement` into it.
    #[must_use]
    pub fn from_placement(board: &Board, placement: &Piece) -> Self {
        let mut board = board.clone();
        board.merge(placement);
        Self::from_board(&board)
    }

    /// Distance from the floor to the top of the stack, `0` for an empty board.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Empty cells with an occupied cell somewhere above them in the same column.
    #[must_use]
    pub fn holes(&self) -> usize {
        self.holes
    }

    #[must_use]
    pub fn full_lines(&self) -> usize {
        self.full_lines
    }
}
