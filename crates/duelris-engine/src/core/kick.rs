//! Wall kick tables.
//!
//! Offsets are `(dx, dy)` with `dy` growing **upward**, as the tables are usually
//! published. [`Piece::try_rotated`](super::Piece::try_rotated) inverts `dy` when applying
//! them to the downward-growing board rows.

use super::piece::{PieceKind, PieceRotation};

/// Kick candidates for one rotation transition, tried in order.
pub type KickOffsets = [(i32, i32); 5];

const IDENTITY: &[(i32, i32)] = &[(0, 0)];

/// Shared by J, L, S, T and Z, indexed by `[from][to == from + 1 ? 0 : 1]`.
const JLSTZ_KICKS: [[KickOffsets; 2]; 4] = [
    [
        // 0 -> 1
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        // 0 -> 3
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    ],
    [
        // 1 -> 2
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        // 1 -> 0
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    ],
    [
        // 2 -> 3
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        // 2 -> 1
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    ],
    [
        // 3 -> 0
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        // 3 -> 2
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    ],
];

const I_KICKS: [[KickOffsets; 2]; 4] = [
    [
        // 0 -> 1
        [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
        // 0 -> 3
        [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    ],
    [
        // 1 -> 2
        [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
        // 1 -> 0
        [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    ],
    [
        // 2 -> 3
        [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
        // 2 -> 1
        [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    ],
    [
        // 3 -> 0
        [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
        // 3 -> 2
        [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    ],
];

/// Returns the kick candidates for rotating `kind` from `from` to `to`.
///
/// The O piece only gets the identity offset. Transitions that are not a single
/// quarter turn also get the identity offset only.
#[must_use]
pub fn kick_offsets(
    kind: PieceKind,
    from: PieceRotation,
    to: PieceRotation,
) -> &'static [(i32, i32)] {
    let table = match kind {
        PieceKind::O => return IDENTITY,
        PieceKind::I => &I_KICKS,
        PieceKind::S | PieceKind::Z | PieceKind::J | PieceKind::L | PieceKind::T => &JLSTZ_KICKS,
    };
    let direction = match from.clockwise_steps_to(to) {
        1 => 0,
        3 => 1,
        _ => return IDENTITY,
    };
    &table[from.as_usize()][direction]
}
