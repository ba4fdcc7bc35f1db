use crate::Agent;
use gridstep_core::{generate_moves, Board, Move, Side};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub struct RandomAgent {
    name: String,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        RandomAgent {
            name: "Random".to_string(),
            rng,
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_move(&mut self, board: &Board, side: Side) -> Option<Move> {
        let moves = generate_moves(board, side);
        moves.as_slice().choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
