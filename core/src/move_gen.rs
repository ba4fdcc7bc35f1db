use crate::board::Board;
use crate::types::{Direction, Move, Position, Side, CELL_COUNT};
use std::fmt;
use thiserror::Error;

/// Upper bound on the number of moves available to one side.
const MAX_MOVES: usize = CELL_COUNT * 4;

/// Why an in-bounds move is rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IllegalReason {
    NotOwnPiece,
    DestinationOccupied,
    NotAdjacent,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalReason::NotOwnPiece => write!(f, "the origin does not hold your piece"),
            IllegalReason::DestinationOccupied => write!(f, "the destination is occupied"),
            IllegalReason::NotAdjacent => {
                write!(f, "pieces move one cell up, down, left or right")
            }
        }
    }
}

/// Move rejection.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum MoveError {
    #[error("position {0} is off the board")]
    OutOfBounds(Position),
    #[error("illegal move {mv}: {reason}")]
    Illegal { mv: Move, reason: IllegalReason },
}

/// A list of moves with a fixed capacity to avoid allocations.
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    count: usize,
}

impl MoveList {
    /// Creates an empty move list.
    pub const fn new() -> Self {
        Self {
            moves: [Move::new(Position::new(0, 0), Position::new(0, 0)); MAX_MOVES],
            count: 0,
        }
    }

    /// Adds a move to the list.
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.count < MAX_MOVES, "Move list overflow");
        self.moves[self.count] = mv;
        self.count += 1;
    }

    /// Returns the number of moves.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the moves as a slice.
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.count]
    }

    /// Returns an iterator over the moves.
    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.as_slice().iter()
    }

    /// Returns true if the list contains the move.
    pub fn contains(&self, mv: Move) -> bool {
        self.iter().any(|&m| m == mv)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks a move for `side`, reporting why it is rejected.
pub fn check_move(board: &Board, mv: Move, side: Side) -> Result<(), MoveError> {
    for pos in [mv.from, mv.to] {
        if !pos.is_on_board() {
            return Err(MoveError::OutOfBounds(pos));
        }
    }

    let reason = if !board.is_side(mv.from, side) {
        IllegalReason::NotOwnPiece
    } else if !board.is_empty(mv.to) {
        IllegalReason::DestinationOccupied
    } else if mv.from.distance(mv.to) != 1 {
        // Distance 1 rules out diagonals and longer jumps alike
        IllegalReason::NotAdjacent
    } else {
        return Ok(());
    };

    Err(MoveError::Illegal { mv, reason })
}

/// Returns true if `side` may play `mv` on `board`.
pub fn is_legal_move(board: &Board, mv: Move, side: Side) -> bool {
    check_move(board, mv, side).is_ok()
}

/// Returns true if any marker of `side` has an empty cardinal neighbour.
/// A side without a legal move has lost.
pub fn has_any_legal_move(board: &Board, side: Side) -> bool {
    board.pieces(side).any(|from| {
        Direction::ALL
            .iter()
            .any(|&d| board.is_empty(from.step(d)))
    })
}

/// Returns true if `side` has markers but none of them can move, or has no
/// markers at all.
pub fn is_blocked(board: &Board, side: Side) -> bool {
    !has_any_legal_move(board, side)
}

/// Generates all legal moves for `side`.
/// Markers are visited in row-major order and each marker tries Up, Down,
/// Left, Right in that order.
pub fn generate_moves(board: &Board, side: Side) -> MoveList {
    let mut moves = MoveList::new();

    for from in board.pieces(side) {
        for &direction in &Direction::ALL {
            let mv = Move::step(from, direction);
            if board.is_empty(mv.to) {
                moves.push(mv);
            }
        }
    }

    moves
}
