pub mod evaluation;
pub mod minimax;
pub mod random;
pub mod search;

use gridstep_core::{Board, Move, Side};

/// Core trait for game agents
pub trait Agent {
    /// Pick a move for `side`, or None if `side` cannot move
    fn select_move(&mut self, board: &Board, side: Side) -> Option<Move>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

pub use evaluation::*;
pub use minimax::MinimaxAgent;
pub use random::RandomAgent;
pub use search::*;
