use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Width and height of the square playing grid.
pub const BOARD_SIZE: i8 = 7;

/// Number of cells on the board.
pub const CELL_COUNT: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// One of the two players.
/// X is player 1 (the human), O is player 2 (the computer).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    X,
    O,
}

impl Side {
    /// Returns the opposite side.
    pub const fn opponent(self) -> Self {
        match self {
            Side::X => Side::O,
            Side::O => Side::X,
        }
    }

    /// Returns the character used to draw this side's markers.
    pub const fn symbol(self) -> char {
        match self {
            Side::X => 'X',
            Side::O => 'O',
        }
    }

    /// Returns the player number shown to the user (1 for X, 2 for O).
    pub const fn player_number(self) -> u8 {
        match self {
            Side::X => 1,
            Side::O => 2,
        }
    }

    /// Returns true if this side plays the maximizing role in the search.
    /// Scores are counted from X's point of view, yet O maximizes them.
    pub const fn is_maximizing(self) -> bool {
        matches!(self, Side::O)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The four cardinal step directions.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in generation order. Move ordering, and therefore
    /// tie-breaking in the search, follows this order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the (row, col) delta of one step in this direction.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// A cell coordinate.
/// Stored signed so that a step off the edge is still representable; use
/// `is_on_board` before indexing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    /// Creates a position. No bounds check is performed.
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Creates a position from a row-major cell index (0-48).
    /// Returns None if index is out of range.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < CELL_COUNT {
            let size = BOARD_SIZE as usize;
            Some(Position::new((index / size) as i8, (index % size) as i8))
        } else {
            None
        }
    }

    /// Returns true if both coordinates lie in [0, BOARD_SIZE).
    pub const fn is_on_board(self) -> bool {
        self.row >= 0 && self.row < BOARD_SIZE && self.col >= 0 && self.col < BOARD_SIZE
    }

    /// Returns the row-major cell index, or None if off the board.
    pub const fn index(self) -> Option<usize> {
        if self.is_on_board() {
            Some(self.row as usize * BOARD_SIZE as usize + self.col as usize)
        } else {
            None
        }
    }

    /// Returns the position one step away in the given direction.
    /// The result may be off the board.
    pub const fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.delta();
        Position::new(self.row + dr, self.col + dc)
    }

    /// Returns the in-board neighbour in the given direction, if any.
    pub const fn neighbour(self, direction: Direction) -> Option<Self> {
        let next = self.step(direction);
        if next.is_on_board() {
            Some(next)
        } else {
            None
        }
    }

    /// Calculates Manhattan distance to another position.
    pub const fn distance(self, other: Position) -> u8 {
        let dr = (self.row as i16 - other.row as i16).unsigned_abs();
        let dc = (self.col as i16 - other.col as i16).unsigned_abs();
        (dr + dc) as u8
    }

    /// Iterates over every on-board position in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELL_COUNT).filter_map(Position::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.row >= 0 && self.row < 26 && self.col >= 0 && self.col < 9 {
            write!(f, "{}{}", (b'a' + self.row as u8) as char, self.col + 1)
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}

/// Coordinate text parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    #[error("expected a row letter and a column digit like 'a3', got '{0}'")]
    InvalidFormat(String),
    #[error("invalid row letter '{0}'")]
    InvalidRow(char),
    #[error("invalid column digit '{0}'")]
    InvalidColumn(char),
}

/// Parses the "a3" convention: row letter from 'a', 1-based column digit.
/// Letters and digits past the board edge still parse; legality checks
/// report them as out of bounds.
impl FromStr for Position {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(row), Some(col), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(CoordError::InvalidFormat(s.trim().to_string()));
        };

        if !row.is_ascii_lowercase() {
            return Err(CoordError::InvalidRow(row));
        }
        let col_index = match col.to_digit(10) {
            Some(d) if d >= 1 => d as i8 - 1,
            _ => return Err(CoordError::InvalidColumn(col)),
        };

        Ok(Position::new((row as u8 - b'a') as i8, col_index))
    }
}

/// A single-step move of one marker.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    /// Creates the move one step from `from` in `direction`.
    pub const fn step(from: Position, direction: Direction) -> Self {
        Self::new(from, from.step(direction))
    }

    /// Returns the move that takes the marker back.
    pub const fn reversed(self) -> Self {
        Self::new(self.to, self.from)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Parses two concatenated coordinates, e.g. "b4c4".
impl FromStr for Move {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 4 || !s.is_ascii() {
            return Err(CoordError::InvalidFormat(s.to_string()));
        }
        let (from, to) = s.split_at(2);
        Ok(Move::new(from.parse()?, to.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::X.opponent(), Side::O);
        assert_eq!(Side::O.opponent(), Side::X);
        assert!(Side::O.is_maximizing());
        assert!(!Side::X.is_maximizing());
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("a3".parse::<Position>(), Ok(Position::new(0, 2)));
        assert_eq!("g7".parse::<Position>(), Ok(Position::new(6, 6)));
        assert_eq!(" c1\n".parse::<Position>(), Ok(Position::new(2, 0)));

        // Off-board coordinates still parse
        let far = "z9".parse::<Position>().unwrap();
        assert!(!far.is_on_board());

        assert_eq!(
            "a0".parse::<Position>(),
            Err(CoordError::InvalidColumn('0'))
        );
        assert_eq!("A3".parse::<Position>(), Err(CoordError::InvalidRow('A')));
        assert!(matches!(
            "a".parse::<Position>(),
            Err(CoordError::InvalidFormat(_))
        ));
        assert!(matches!(
            "a33".parse::<Position>(),
            Err(CoordError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(0, 2).to_string(), "a3");
        assert_eq!(Position::new(6, 0).to_string(), "g1");
        assert_eq!(Position::new(-1, 0).to_string(), "(-1, 0)");
    }

    #[test]
    fn test_index_round_trip() {
        for (i, pos) in Position::all().enumerate() {
            assert_eq!(pos.index(), Some(i));
        }
        assert_eq!(Position::all().count(), CELL_COUNT);
        assert_eq!(Position::new(7, 0).index(), None);
        assert_eq!(Position::from_index(CELL_COUNT), None);
    }

    #[test]
    fn test_step_and_neighbour() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.step(Direction::Up), Position::new(-1, 0));
        assert_eq!(corner.neighbour(Direction::Up), None);
        assert_eq!(corner.neighbour(Direction::Right), Some(Position::new(0, 1)));
        assert_eq!(corner.distance(Position::new(1, 1)), 2);
    }

    #[test]
    fn test_move_text() {
        let mv: Move = "b4c4".parse().unwrap();
        assert_eq!(mv, Move::new(Position::new(1, 3), Position::new(2, 3)));
        assert_eq!(mv.to_string(), "b4c4");
        assert_eq!(mv.reversed().reversed(), mv);
        assert!("b4".parse::<Move>().is_err());
    }
}
