use gridstep_core::{Board, Side};

/// Evaluates a position by material alone.
/// Returns X's marker count minus O's; positive values favor X.
pub fn evaluate(board: &Board) -> i32 {
    evaluate_side(board, Side::X) - evaluate_side(board, Side::O)
}

/// Material for a single side.
fn evaluate_side(board: &Board, side: Side) -> i32 {
    board.count(side) as i32
}

/// Static evaluation for anything the search can score.
pub trait Evaluatable {
    fn evaluate(&self) -> i32;
}

impl Evaluatable for Board {
    fn evaluate(&self) -> i32 {
        evaluate(self)
    }
}
