use crate::board::Board;
use crate::move_gen::{generate_moves, has_any_legal_move};
use crate::types::{Move, Side};

/// Perft (performance test) results.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PerftResults {
    pub nodes: u64,
    /// Leaf positions where the side to move is blocked.
    pub blocked: u64,
}

impl PerftResults {
    /// Combines results from child nodes.
    pub fn add(&mut self, other: &Self) {
        self.nodes += other.nodes;
        self.blocked += other.blocked;
    }
}

/// Counts leaf nodes of the move tree to the given depth, with `side`
/// moving first and sides alternating.
/// The board is mutated while walking and restored before returning.
pub fn perft(board: &mut Board, side: Side, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(board, side);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for &mv in moves.iter() {
        board.apply_move(mv);
        nodes += perft(board, side.opponent(), depth - 1);
        board.undo_move(mv);
    }

    nodes
}

/// Performs perft with a per-root-move breakdown.
pub fn perft_divide(board: &mut Board, side: Side, depth: u8) -> Vec<(Move, u64)> {
    let moves = generate_moves(board, side);
    let mut results = Vec::with_capacity(moves.len());

    for &mv in moves.iter() {
        board.apply_move(mv);
        let nodes = if depth <= 1 {
            1
        } else {
            perft(board, side.opponent(), depth - 1)
        };
        board.undo_move(mv);
        results.push((mv, nodes));
    }

    results
}

/// Performs perft, also counting leaves where the side to move is blocked.
pub fn perft_detailed(board: &mut Board, side: Side, depth: u8) -> PerftResults {
    let mut results = PerftResults::default();

    if depth == 0 {
        results.nodes = 1;
        if !has_any_legal_move(board, side) {
            results.blocked = 1;
        }
        return results;
    }

    let moves = generate_moves(board, side);
    for &mv in moves.iter() {
        board.apply_move(mv);
        let child = perft_detailed(board, side.opponent(), depth - 1);
        board.undo_move(mv);
        results.add(&child);
    }

    results
}
