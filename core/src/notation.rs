//! Compact text notation for board positions.
//!
//! Rows are listed from row 'a' down to row 'g' and separated by '/'.
//! 'x' and 'o' are markers, digits 1-7 are runs of empty cells.

use crate::board::Board;
use crate::types::{Position, Side, BOARD_SIZE};
use thiserror::Error;

/// Notation parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("expected {expected} rows, got {got}")]
    RowCount { expected: usize, got: usize },
    #[error("row {row} has {cells} cells, expected {expected}")]
    RowLength {
        row: char,
        cells: usize,
        expected: usize,
    },
    #[error("invalid character '{0}'")]
    InvalidChar(char),
}

impl Board {
    /// Parses a board from notation, e.g. the empty board is "7/7/7/7/7/7/7".
    pub fn from_notation(text: &str) -> Result<Self, NotationError> {
        let mut board = Board::empty();
        let rows: Vec<&str> = text.trim().split('/').collect();

        if rows.len() != BOARD_SIZE as usize {
            return Err(NotationError::RowCount {
                expected: BOARD_SIZE as usize,
                got: rows.len(),
            });
        }

        for (row_idx, row_str) in rows.iter().enumerate() {
            let mut col = 0usize;

            for ch in row_str.chars() {
                match ch {
                    '1'..='7' => col += ch as usize - '0' as usize,
                    'x' | 'X' | 'o' | 'O' => {
                        if col < BOARD_SIZE as usize {
                            let side = if ch.eq_ignore_ascii_case(&'x') {
                                Side::X
                            } else {
                                Side::O
                            };
                            board.set_piece(Position::new(row_idx as i8, col as i8), Some(side));
                        }
                        col += 1;
                    }
                    _ => return Err(NotationError::InvalidChar(ch)),
                }
            }

            if col != BOARD_SIZE as usize {
                return Err(NotationError::RowLength {
                    row: (b'a' + row_idx as u8) as char,
                    cells: col,
                    expected: BOARD_SIZE as usize,
                });
            }
        }

        Ok(board)
    }

    /// Converts the board to notation.
    pub fn to_notation(&self) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE as usize);

        for row in 0..BOARD_SIZE {
            let mut row_str = String::new();
            let mut empty_count = 0;

            for col in 0..BOARD_SIZE {
                match self.piece_at(Position::new(row, col)) {
                    Some(side) => {
                        if empty_count > 0 {
                            row_str.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        row_str.push(side.symbol().to_ascii_lowercase());
                    }
                    None => empty_count += 1,
                }
            }

            if empty_count > 0 {
                row_str.push_str(&empty_count.to_string());
            }
            rows.push(row_str);
        }

        rows.join("/")
    }
}

/// Named positions for testing and demos.
pub mod positions {
    /// Empty board.
    pub const EMPTY: &str = "7/7/7/7/7/7/7";

    /// A lone O marker in the centre at d4.
    pub const LONE_CENTRE: &str = "7/7/7/3o3/7/7/7";

    /// X cornered at a1 by two O markers; X has no legal move.
    pub const X_CORNERED: &str = "xo5/o6/7/7/7/7/7";

    /// Three X against one O, everything free to move.
    pub const X_AHEAD: &str = "x5x/7/7/3o3/7/7/6x";

    /// A crowded middlegame.
    pub const CROWDED: &str = "xo1ox2/2x2o1/o2x3/1x1o1x1/3o2o/x5o/1o1x3";
}
