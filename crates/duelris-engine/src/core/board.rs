use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::BoardOverflowError;

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{Piece, PieceKind, WIDTH_I32},
};

/// A single cell of the board.
///
/// Each cell maps to a numeric identifier: `0` for empty, `1..=7` for the piece kind
/// that locked there, and [`Cell::GARBAGE_ID`] for garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Piece(PieceKind),
    Garbage,
}

impl Cell {
    pub const GARBAGE_ID: u8 = 8;

    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Piece(kind) => kind.id(),
            Cell::Garbage => Self::GARBAGE_ID,
        }
    }

    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Cell::Empty),
            Self::GARBAGE_ID => Some(Cell::Garbage),
            _ => match PieceKind::from_id(id) {
                Some(kind) => Some(Cell::Piece(kind)),
                None => None,
            },
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Piece(kind) => kind.as_char(),
            Cell::Garbage => 'G',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            'G' => Some(Cell::Garbage),
            _ => match PieceKind::from_char(c) {
                Some(kind) => Some(Cell::Piece(kind)),
                None => None,
            },
        }
    }
}

type Row = [Cell; BOARD_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; BOARD_WIDTH];

/// Error returned by [`Board::from_rows`] for malformed board text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("expected at most {BOARD_HEIGHT} rows, got {_0}")]
    TooManyRows(#[error(not(source))] usize),
    #[display("row {row} has {len} cells, expected {BOARD_WIDTH}")]
    InvalidRowWidth { row: usize, len: usize },
    #[display("invalid cell {cell:?} at row {row}")]
    InvalidCell { row: usize, cell: char },
}

/// The locked cells of one player's playfield.
///
/// A fixed 10×20 grid, row `0` at the top.
///
/// # Example
///
/// ```
/// use duelris_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::new();
/// let piece = Piece::new(PieceKind::O).dropped(&board);
/// assert!(!board.collides(&piece));
/// board.merge(&piece);
/// assert_eq!(board.occupied_count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Builds a board from text rows, aligned to the bottom of the board.
    ///
    /// Each row must have exactly [`BOARD_WIDTH`] characters, using `.` for empty cells,
    /// `G` for garbage, and a piece letter for locked pieces.
    ///
    /// ```
    /// use duelris_engine::{Board, Cell};
    ///
    /// let board = Board::from_rows(["GGGGGGGGG."]).unwrap();
    /// assert_eq!(board.cell(0, 19), Some(Cell::Garbage));
    /// assert_eq!(board.cell(9, 19), Some(Cell::Empty));
    /// ```
    pub fn from_rows<I, S>(rows: I) -> Result<Self, ParseBoardError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = rows
            .into_iter()
            .enumerate()
            .map(|(row, text)| {
                let text = text.as_ref();
                let len = text.chars().count();
                if len != BOARD_WIDTH {
                    return Err(ParseBoardError::InvalidRowWidth { row, len });
                }
                let mut cells = EMPTY_ROW;
                for (cell, c) in cells.iter_mut().zip(text.chars()) {
                    *cell =
                        Cell::from_char(c).ok_or(ParseBoardError::InvalidCell { row, cell: c })?;
                }
                Ok(cells)
            })
            .collect::<Result<Vec<_>, _>>()?;
        if parsed.len() > BOARD_HEIGHT {
            return Err(ParseBoardError::TooManyRows(parsed.len()));
        }
        let mut board = Self::new();
        board.rows[BOARD_HEIGHT - parsed.len()..].copy_from_slice(&parsed);
        Ok(board)
    }

    /// Returns the cell at `(x, y)`, or `None` if outside the board.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Iterates over rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.rows.iter()
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(|c| !c.is_empty())
    }

    #[must_use]
    pub fn is_row_empty(&self, y: usize) -> bool {
        self.rows[y].iter().all(|c| c.is_empty())
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| !c.is_empty()).count()
    }

    /// Index of the topmost row containing any non-empty cell.
    #[must_use]
    pub fn top_occupied_row(&self) -> Option<usize> {
        (0..BOARD_HEIGHT).find(|&y| !self.is_row_empty(y))
    }

    /// Checks whether the piece overlaps a wall, the floor, or a locked cell.
    ///
    /// Cells above the top of the board only check the side walls.
    #[must_use]
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(x, y)| {
            if !(0..WIDTH_I32).contains(&x) {
                return true;
            }
            if y < 0 {
                return false;
            }
            self.cell(x, y).is_none_or(|cell| !cell.is_empty())
        })
    }

    /// Writes the piece's cells into the board.
    ///
    /// No collision check is done; cells outside the board are dropped.
    pub fn merge(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *cell = Cell::Piece(piece.kind());
            }
        }
    }

    /// Removes full rows and returns how many were removed.
    ///
    /// Rows above a removed row shift down; empty rows enter at the top.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if self.is_row_full(y) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(EMPTY_ROW);
        count
    }

    /// Pushes `count` garbage rows in from the bottom with a random gap column.
    ///
    /// The gap column is chosen once and shared by every row of this call. Returns the
    /// gap column, or `None` when `count` is zero.
    pub fn inject_garbage<R>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<Option<usize>, BoardOverflowError>
    where
        R: Rng + ?Sized,
    {
        if count == 0 {
            return Ok(None);
        }
        let gap = rng.random_range(0..BOARD_WIDTH);
        self.inject_garbage_with_gap(count, gap)?;
        Ok(Some(gap))
    }

    /// Like [`Self::inject_garbage`], with a fixed gap column.
    ///
    /// Fails as soon as the top row is occupied when a shift is needed. Rows injected
    /// before the failure stay on the board.
    ///
    /// # Panics
    ///
    /// Panics if `gap` is not a column of the board (`gap >= BOARD_WIDTH`).
    pub fn inject_garbage_with_gap(
        &mut self,
        count: usize,
        gap: usize,
    ) -> Result<(), BoardOverflowError> {
        assert!(gap < BOARD_WIDTH);
        let mut garbage = [Cell::Garbage; BOARD_WIDTH];
        garbage[gap] = Cell::Empty;
        for _ in 0..count {
            if !self.is_row_empty(0) {
                return Err(BoardOverflowError);
            }
            self.rows.copy_within(1.., 0);
            self.rows[BOARD_HEIGHT - 1] = garbage;
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: ["..........", ..., "GGGG.GGGGG"] (top to bottom)
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|c| c.as_char()).collect())
            .collect();
        rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Board::from_rows(rows).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn filled_row() -> Row {
        [Cell::Piece(PieceKind::I); BOARD_WIDTH]
    }

    #[test]
    fn test_initial_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(board.top_occupied_row(), None);
        assert!(board.rows().all(|row| row.iter().all(|c| c.is_empty())));
    }

    #[test]
    fn test_cell_ids() {
        assert_eq!(Cell::Empty.id(), 0);
        assert_eq!(Cell::Garbage.id(), 8);
        for id in 0..=8 {
            assert_eq!(Cell::from_id(id).map(Cell::id), Some(id));
        }
        assert_eq!(Cell::from_id(9), None);
    }

    #[test]
    fn test_collides_with_walls_and_floor() {
        let board = Board::new();
        let piece = Piece::new(PieceKind::O);
        assert!(!board.collides(&piece));
        assert!(board.collides(&piece.with_position(-1, 5)));
        assert!(board.collides(&piece.with_position(9, 5)));
        assert!(board.collides(&piece.with_position(4, 19)));
        assert!(!board.collides(&piece.with_position(4, 18)));
    }

    #[test]
    fn test_cells_above_top_do_not_collide() {
        let mut board = Board::new();
        board.rows[0] = [Cell::Garbage; BOARD_WIDTH];
        board.rows[0][4] = Cell::Empty;
        board.rows[0][5] = Cell::Empty;
        // Bottom half of the O at row 0 in the gap, top half above the board.
        let piece = Piece::new(PieceKind::O).with_position(4, -1);
        assert!(!board.collides(&piece));
        // Still bounded by the side walls above the board.
        assert!(board.collides(&piece.with_position(-1, -2)));
    }

    #[test]
    fn test_merge_writes_piece_kind() {
        let mut board = Board::new();
        let piece = Piece::new(PieceKind::T).with_position(0, 18);
        board.merge(&piece);
        assert_eq!(board.cell(1, 18), Some(Cell::Piece(PieceKind::T)));
        assert_eq!(board.cell(0, 19), Some(Cell::Piece(PieceKind::T)));
        assert_eq!(board.cell(2, 19), Some(Cell::Piece(PieceKind::T)));
        assert_eq!(board.occupied_count(), 4);
    }

    #[test]
    fn test_merge_drops_cells_above_top() {
        let mut board = Board::new();
        let piece = Piece::new(PieceKind::O).with_position(4, -1);
        board.merge(&piece);
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn test_clear_full_rows_shifts_rows_down() {
        let mut board = Board::from_rows([
            "T.........",
            "IIIIIIIIII",
            "..S.......",
            "IIIIIIIIII",
        ])
        .unwrap();
        let before = board.occupied_count();

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.occupied_count(), before - 2 * BOARD_WIDTH);
        assert_eq!(board.cell(2, 19), Some(Cell::Piece(PieceKind::S)));
        assert_eq!(board.cell(0, 18), Some(Cell::Piece(PieceKind::T)));
        assert!(board.is_row_empty(17));
        assert!((0..BOARD_HEIGHT).all(|y| !board.is_row_full(y)));
    }

    #[test]
    fn test_clear_full_rows_all_filled() {
        let mut board = Board::new();
        board.rows.fill(filled_row());
        assert_eq!(board.clear_full_rows(), BOARD_HEIGHT);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_clear_full_rows_partial_row_remains() {
        let mut board = Board::from_rows(["IIIIIIIII."]).unwrap();
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board.occupied_count(), BOARD_WIDTH - 1);
    }

    #[test]
    fn test_inject_garbage_shares_gap_column() {
        let mut board = Board::from_rows(["TTT......."]).unwrap();
        let mut rng = Pcg32::seed_from_u64(7);

        let gap = board.inject_garbage(3, &mut rng).unwrap().unwrap();

        for y in BOARD_HEIGHT - 3..BOARD_HEIGHT {
            let row = board.rows[y];
            assert_eq!(row.iter().filter(|c| c.is_empty()).count(), 1);
            assert_eq!(row[gap], Cell::Empty);
        }
        // Existing content moved up by three rows.
        assert_eq!(board.cell(0, 16), Some(Cell::Piece(PieceKind::T)));
        assert!(board.is_row_empty(15));
    }

    #[test]
    fn test_inject_zero_garbage_is_noop() {
        let mut board = Board::new();
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(board.inject_garbage(0, &mut rng), Ok(None));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_inject_garbage_overflow() {
        let mut board = Board::new();
        board.rows[0][3] = Cell::Piece(PieceKind::Z);
        assert_eq!(board.inject_garbage_with_gap(1, 0), Err(BoardOverflowError));
    }

    #[test]
    #[should_panic(expected = "gap < BOARD_WIDTH")]
    fn test_inject_garbage_gap_outside_board() {
        let mut board = Board::new();
        let _ = board.inject_garbage_with_gap(1, BOARD_WIDTH);
    }

    #[test]
    fn test_inject_more_garbage_than_rows_overflows() {
        let mut board = Board::new();
        assert_eq!(
            board.inject_garbage_with_gap(BOARD_HEIGHT, 0),
            Ok(()),
            "a full board of garbage still fits",
        );
        assert_eq!(board.inject_garbage_with_gap(1, 0), Err(BoardOverflowError));
    }

    #[test]
    fn test_from_rows_errors() {
        assert!(matches!(
            Board::from_rows(["..."]),
            Err(ParseBoardError::InvalidRowWidth { row: 0, len: 3 })
        ));
        assert!(matches!(
            Board::from_rows(["........x."]),
            Err(ParseBoardError::InvalidCell { row: 0, cell: 'x' })
        ));
        assert!(matches!(
            Board::from_rows(vec![".........."; 21]),
            Err(ParseBoardError::TooManyRows(21))
        ));
    }

    #[test]
    fn test_board_serialization() {
        let board = Board::from_rows(["GGGG.GGGGG", "OO........"]).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.ends_with("\"GGGG.GGGGG\",\"OO........\"]"));
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }
}
