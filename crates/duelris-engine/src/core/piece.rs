use serde::{Deserialize, Serialize};

use super::{BOARD_WIDTH, board::Board, kick};

/// Board width as a signed coordinate.
#[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub(crate) const WIDTH_I32: i32 = BOARD_WIDTH as i32;

/// A falling tetromino with position, rotation state, and shape.
///
/// Pieces are values: movement and rotation return new `Piece` instances and never
/// mutate the original, so a rejected rotation leaves the caller's piece untouched.
///
/// # Coordinate System
///
/// - `(x, y)` is the board position of the top-left corner of the shape matrix
/// - `y` may be negative while the piece overlaps the area above the board
/// - The shape matrix is always derived from the base definition by [`rotate_matrix`]
///
/// # Example
///
/// ```
/// use duelris_engine::{Board, Piece, PieceKind, RotationDirection};
///
/// let board = Board::new();
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.moved(1, 0);
/// let rotated = moved.try_rotated(RotationDirection::Clockwise, &board).unwrap();
/// assert_eq!(rotated.rotation().as_usize(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    shape: Shape,
    x: i32,
    y: i32,
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "kind#rotation@x,y" (e.g., "S#1@4,-1")
        let s = format!(
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.x,
            self.y
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let s = String::deserialize(deserializer)?;
        let (kind_str, rest) = s
            .split_once('#')
            .ok_or_else(|| D::Error::custom(format!("missing '#' in piece '{s}'")))?;
        let (rotation_str, position_str) = rest
            .split_once('@')
            .ok_or_else(|| D::Error::custom(format!("missing '@' in piece '{s}'")))?;
        let (x_str, y_str) = position_str
            .split_once(',')
            .ok_or_else(|| D::Error::custom(format!("missing ',' in piece '{s}'")))?;

        let mut chars = kind_str.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => PieceKind::from_char(c)
                .ok_or_else(|| D::Error::custom(format!("invalid piece kind: {c}")))?,
            _ => {
                return Err(D::Error::custom(format!(
                    "piece kind must be single character, got '{kind_str}'"
                )));
            }
        };
        let rotation = rotation_str
            .parse::<u8>()
            .ok()
            .filter(|r| *r < 4)
            .ok_or_else(|| D::Error::custom(format!("rotation must be 0-3, got {rotation_str}")))?;
        let x = x_str
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid x position: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid y position: {y_str} ({e})")))?;

        Ok(Piece::new(kind)
            .with_rotation(PieceRotation(rotation))
            .with_position(x, y))
    }
}

impl Piece {
    /// Creates a piece in spawn orientation, centered horizontally on row 0.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        let shape = kind.base_shape();
        #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        let size = shape.size() as i32;
        Self {
            kind,
            rotation: PieceRotation::default(),
            shape,
            x: (WIDTH_I32 - size) / 2,
            y: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Returns the board coordinates of the occupied cells.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    #[must_use]
    pub fn with_position(&self, x: i32, y: i32) -> Self {
        Self { x, y, ..*self }
    }

    /// Returns this piece in the given rotation state, re-derived from the base shape.
    ///
    /// The position is kept as is; no collision checks or kicks are applied.
    #[must_use]
    pub fn with_rotation(&self, rotation: PieceRotation) -> Self {
        let mut shape = self.kind.base_shape();
        for _ in 0..rotation.as_usize() {
            shape = rotate_matrix(&shape);
        }
        Self {
            rotation,
            shape,
            ..*self
        }
    }

    /// Rotates the shape one step in place without trying any kick.
    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        let shape = match direction {
            RotationDirection::Clockwise => rotate_matrix(&self.shape),
            RotationDirection::CounterClockwise => {
                rotate_matrix(&rotate_matrix(&rotate_matrix(&self.shape)))
            }
        };
        Self {
            rotation: self.rotation.rotated(direction),
            shape,
            ..*self
        }
    }

    /// Rotates with wall kicks.
    ///
    /// Kick candidates for the `(from, to)` transition are tried in table order and the
    /// first one that does not collide wins. Returns `None` if every candidate collides.
    #[must_use]
    pub fn try_rotated(&self, direction: RotationDirection, board: &Board) -> Option<Self> {
        let rotated = self.rotated(direction);
        kick::kick_offsets(self.kind, self.rotation, rotated.rotation)
            .iter()
            // Kick tables are written with y growing upward.
            .map(|&(dx, dy)| rotated.moved(dx, -dy))
            .find(|candidate| !board.collides(candidate))
    }

    /// Returns the position where this piece would land if dropped straight down.
    #[must_use]
    pub fn dropped(&self, board: &Board) -> Self {
        let mut dropped = *self;
        loop {
            let next = dropped.moved(0, 1);
            if board.collides(&next) {
                return dropped;
            }
            dropped = next;
        }
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const ALL: [Self; 4] = [Self(0), Self(1), Self(2), Self(3)];

    #[must_use]
    pub fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => Self((self.0 + 1) % 4),
            RotationDirection::CounterClockwise => Self((self.0 + 3) % 4),
        }
    }

    /// Number of clockwise steps needed to reach `target`.
    #[must_use]
    pub fn clockwise_steps_to(self, target: Self) -> usize {
        usize::from((target.0 + 4 - self.0) % 4)
    }

    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Kind of tetromino.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    O = 1,
    S = 2,
    Z = 3,
    J = 4,
    L = 5,
    T = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Cell identifier written into the board when this piece locks (`1..=7`).
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8 + 1
    }

    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        if id >= 1 && id as usize <= Self::LEN {
            Some(Self::ALL[id as usize - 1])
        } else {
            None
        }
    }

    /// Spawn-orientation shape, padded to a square matrix.
    #[must_use]
    pub const fn base_shape(self) -> Shape {
        BASE_SHAPES[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// ```
    /// use duelris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Square occupancy matrix of a piece.
///
/// Stored in a 4×4 array; only the top-left `size × size` block is meaningful
/// (4 for I, 2 for O, 3 for the others).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    size: usize,
    cells: [[bool; 4]; 4],
}

impl Shape {
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub const fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row][col]
    }

    /// Offsets `(dx, dy)` of the filled cells, row by row.
    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.size).flat_map(move |row| {
            (0..self.size)
                .filter(move |&col| self.cells[row][col])
                .map(move |col| (col as i32, row as i32))
        })
    }
}

/// Rotates a shape 90° clockwise: `s'[i][j] = s[N-1-j][i]`.
#[must_use]
pub const fn rotate_matrix(shape: &Shape) -> Shape {
    let n = shape.size;
    let mut cells = [[false; 4]; 4];
    let mut i = 0;
    while i < n {
        let mut j = 0;
        while j < n {
            cells[i][j] = shape.cells[n - 1 - j][i];
            j += 1;
        }
        i += 1;
    }
    Shape { size: n, cells }
}

const BASE_SHAPES: [Shape; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    const fn s(size: usize, cells: [[bool; 4]; 4]) -> Shape {
        Shape { size, cells }
    }
    [
        // I-piece
        s(4, [EEEE, [C, C, C, C], EEEE, EEEE]),
        // O-piece
        s(2, [[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // S-piece
        s(3, [[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // Z-piece
        s(3, [[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
        // J-piece
        s(3, [[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        s(3, [[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
        // T-piece
        s(3, [[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_matrix_four_times_is_identity() {
        for kind in PieceKind::ALL {
            let base = kind.base_shape();
            let mut shape = base;
            for _ in 0..4 {
                shape = rotate_matrix(&shape);
            }
            assert_eq!(shape, base, "{kind:?}");
        }
    }

    #[test]
    fn test_rotate_matrix_t_piece() {
        // .T.      .T.
        // TTT  ->  .TT
        // ...      .T.
        let rotated = rotate_matrix(&PieceKind::T.base_shape());
        let filled: Vec<_> = rotated.filled_cells().collect();
        assert_eq!(filled, vec![(1, 0), (1, 1), (2, 1), (1, 2)]);
    }

    #[test]
    fn test_o_piece_is_rotation_invariant() {
        let base = PieceKind::O.base_shape();
        assert_eq!(rotate_matrix(&base), base);
    }

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in PieceKind::ALL {
            let piece = Piece::new(kind);
            for rotation in PieceRotation::ALL {
                assert_eq!(piece.with_rotation(rotation).cells().count(), 4);
            }
        }
    }

    #[test]
    fn test_spawn_is_centered() {
        assert_eq!(Piece::new(PieceKind::I).x(), 3);
        assert_eq!(Piece::new(PieceKind::O).x(), 4);
        assert_eq!(Piece::new(PieceKind::T).x(), 3);
        assert!(PieceKind::ALL.iter().all(|k| Piece::new(*k).y() == 0));
    }

    #[test]
    fn test_four_rotations_on_empty_board_restore_shape() {
        let board = Board::new();
        for kind in PieceKind::ALL {
            let original = Piece::new(kind).moved(0, 5);
            let mut piece = original;
            for _ in 0..4 {
                piece = piece
                    .try_rotated(RotationDirection::Clockwise, &board)
                    .unwrap();
            }
            assert_eq!(piece.shape(), original.shape(), "{kind:?}");
            assert_eq!(piece.rotation(), original.rotation());
        }
    }

    #[test]
    fn test_counterclockwise_undoes_clockwise() {
        let piece = Piece::new(PieceKind::L);
        let back = piece
            .rotated(RotationDirection::Clockwise)
            .rotated(RotationDirection::CounterClockwise);
        assert_eq!(back, piece);
    }

    #[test]
    fn test_with_rotation_matches_successive_rotations() {
        for kind in PieceKind::ALL {
            let mut piece = Piece::new(kind);
            for rotation in PieceRotation::ALL {
                assert_eq!(Piece::new(kind).with_rotation(rotation), piece);
                piece = piece.rotated(RotationDirection::Clockwise);
            }
        }
    }

    #[test]
    fn test_clockwise_steps_to() {
        let r0 = PieceRotation::ALL[0];
        let r3 = PieceRotation::ALL[3];
        assert_eq!(r0.clockwise_steps_to(r3), 3);
        assert_eq!(r3.clockwise_steps_to(r0), 1);
        assert_eq!(r0.clockwise_steps_to(r0), 0);
    }

    #[test]
    fn test_piece_kind_ids() {
        for kind in PieceKind::ALL {
            assert!((1..=7).contains(&kind.id()));
            assert_eq!(PieceKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(PieceKind::from_id(0), None);
        assert_eq!(PieceKind::from_id(8), None);
    }

    #[test]
    fn test_piece_serialization() {
        let piece = Piece::new(PieceKind::S)
            .with_rotation(PieceRotation(1))
            .with_position(4, -1);

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"S#1@4,-1\"");

        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_piece_deserialization_error_cases() {
        assert!(serde_json::from_str::<Piece>("\"S1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@4\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"X#1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#4@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@abc,18\"").is_err());
    }
}
