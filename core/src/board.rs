/// Board representation: a fixed 7x7 grid of optional markers.
/// Search mutates a single board in place and undoes every trial move, so
/// the board is plain data with cheap cell writes.
use crate::types::*;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Board construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cannot place {requested} markers on a board with {capacity} cells")]
    OverCapacity { requested: usize, capacity: usize },
}

/// Array-based board, indexed by `Position::index()`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Board {
    cells: [Option<Side>; CELL_COUNT],
}

impl Board {
    /// Creates an empty board.
    pub const fn empty() -> Self {
        Self {
            cells: [None; CELL_COUNT],
        }
    }

    /// Creates a board with `count_x` X markers and `count_o` O markers on
    /// distinct random cells.
    pub fn random<R: Rng + ?Sized>(
        count_x: usize,
        count_o: usize,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        let mut board = Self::empty();
        board.place_random(count_x, count_o, rng)?;
        Ok(board)
    }

    /// Places markers on distinct random empty cells of this board.
    /// X markers are placed first, then O markers.
    pub fn place_random<R: Rng + ?Sized>(
        &mut self,
        count_x: usize,
        count_o: usize,
        rng: &mut R,
    ) -> Result<(), BoardError> {
        let mut free: Vec<Position> = Position::all().filter(|&p| self.is_empty(p)).collect();
        let requested = count_x + count_o;
        if requested > free.len() {
            return Err(BoardError::OverCapacity {
                requested,
                capacity: free.len(),
            });
        }

        free.shuffle(rng);
        for (i, &pos) in free.iter().take(requested).enumerate() {
            let side = if i < count_x { Side::X } else { Side::O };
            self.set_piece(pos, Some(side));
        }

        Ok(())
    }

    /// Gets the marker at the given position.
    /// Off-board positions have no marker.
    pub fn piece_at(&self, pos: Position) -> Option<Side> {
        pos.index().and_then(|i| self.cells[i])
    }

    /// Sets the marker at the given position. Off-board writes are ignored.
    pub fn set_piece(&mut self, pos: Position, piece: Option<Side>) {
        debug_assert!(pos.is_on_board(), "write off the board at {:?}", pos);
        if let Some(i) = pos.index() {
            self.cells[i] = piece;
        }
    }

    /// Returns true if the position is on the board and holds no marker.
    pub fn is_empty(&self, pos: Position) -> bool {
        pos.index().map_or(false, |i| self.cells[i].is_none())
    }

    /// Returns true if the position holds a marker of the given side.
    pub fn is_side(&self, pos: Position, side: Side) -> bool {
        self.piece_at(pos) == Some(side)
    }

    /// Counts the markers of the given side.
    pub fn count(&self, side: Side) -> usize {
        self.cells.iter().filter(|&&c| c == Some(side)).count()
    }

    /// Counts all markers on the board.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Iterates over the positions of the given side's markers in
    /// row-major order.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(move |&p| self.is_side(p, side))
    }

    /// Moves the marker at `mv.from` onto `mv.to` by swapping the two cells.
    /// Does not check legality.
    pub fn apply_move(&mut self, mv: Move) {
        debug_assert!(mv.from.is_on_board() && mv.to.is_on_board());
        if let (Some(a), Some(b)) = (mv.from.index(), mv.to.index()) {
            self.cells.swap(a, b);
        }
    }

    /// Reverts `apply_move(mv)`.
    pub fn undo_move(&mut self, mv: Move) {
        self.apply_move(mv.reversed());
    }

    /// Returns a copy with every X marker turned into O and vice versa.
    pub fn mirrored_sides(&self) -> Self {
        let mut mirrored = self.clone();
        for cell in mirrored.cells.iter_mut() {
            *cell = cell.map(Side::opponent);
        }
        mirrored
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_board() {
        let board = Board::empty();
        assert_eq!(board.occupied(), 0);
        assert!(Position::all().all(|p| board.is_empty(p)));
        assert!(!board.is_empty(Position::new(-1, 3)));
        assert_eq!(board.piece_at(Position::new(7, 7)), None);
    }

    #[test]
    fn test_random_placement_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        for (x, o) in [(0, 0), (1, 1), (5, 3), (24, 25), (49, 0)] {
            let board = Board::random(x, o, &mut rng).unwrap();
            assert_eq!(board.count(Side::X), x);
            assert_eq!(board.count(Side::O), o);
            assert_eq!(board.occupied(), x + o);
        }
    }

    #[test]
    fn test_random_placement_over_capacity() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            Board::random(30, 20, &mut rng),
            Err(BoardError::OverCapacity {
                requested: 50,
                capacity: 49
            })
        );

        // Capacity counts only the cells still free
        let mut board = Board::empty();
        board.set_piece(Position::new(0, 0), Some(Side::X));
        assert!(board.place_random(48, 1, &mut rng).is_err());
        assert!(board.place_random(47, 1, &mut rng).is_ok());
        assert_eq!(board.occupied(), 49);
    }

    #[test]
    fn test_random_placement_is_reproducible() {
        let a = Board::random(6, 6, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = Board::random(6, 6, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_apply_and_undo_restores_board() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let mut board = Board::random(8, 8, &mut rng).unwrap();
            let original = board.clone();
            let from = board.pieces(Side::X).next().unwrap();
            let Some(to) = Direction::ALL
                .iter()
                .filter_map(|&d| from.neighbour(d))
                .find(|&p| board.is_empty(p))
            else {
                continue;
            };
            let mv = Move::new(from, to);

            board.apply_move(mv);
            assert_eq!(board.piece_at(to), Some(Side::X));
            assert!(board.is_empty(from));
            assert_eq!(board.count(Side::X), 8);

            board.undo_move(mv);
            assert_eq!(board, original);
        }
    }

    #[test]
    fn test_pieces_row_major() {
        let mut board = Board::empty();
        board.set_piece(Position::new(4, 1), Some(Side::O));
        board.set_piece(Position::new(0, 6), Some(Side::O));
        board.set_piece(Position::new(4, 0), Some(Side::O));
        board.set_piece(Position::new(2, 2), Some(Side::X));

        let order: Vec<_> = board.pieces(Side::O).collect();
        assert_eq!(
            order,
            vec![Position::new(0, 6), Position::new(4, 0), Position::new(4, 1)]
        );
    }

    #[test]
    fn test_mirrored_sides() {
        let board = Board::random(4, 2, &mut StdRng::seed_from_u64(3)).unwrap();
        let mirrored = board.mirrored_sides();
        assert_eq!(mirrored.count(Side::X), 2);
        assert_eq!(mirrored.count(Side::O), 4);
        assert_eq!(mirrored.mirrored_sides(), board);
    }
}
