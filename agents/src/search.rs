use crate::evaluation::evaluate;
use gridstep_core::{generate_moves, has_any_legal_move, Board, Move, Position, Side};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Search depth used when none is configured.
pub const DEFAULT_DEPTH: u8 = 8;
const TIME_CHECK_INTERVAL: u64 = 1000; // Check time every 1000 nodes

/// How much of a ply is skipped once `beta <= alpha`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pruning {
    /// Skip the remaining directions of the marker that caused the cutoff;
    /// later markers are still tried.
    #[default]
    Direction,
    /// Skip the rest of the ply.
    Full,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
    pub stopped: bool,
}

#[derive(Debug, Clone)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub move_time: Option<Duration>,
    pub nodes: Option<u64>,
    pub pruning: Pruning,
}

impl SearchLimits {
    pub fn depth(depth: u8) -> Self {
        Self {
            max_depth: depth,
            move_time: None,
            nodes: None,
            pruning: Pruning::default(),
        }
    }

    pub fn move_time(millis: u64) -> Self {
        Self {
            move_time: Some(Duration::from_millis(millis)),
            ..Self::depth(DEFAULT_DEPTH)
        }
    }

    pub fn nodes(max_nodes: u64) -> Self {
        Self {
            nodes: Some(max_nodes),
            ..Self::depth(DEFAULT_DEPTH)
        }
    }

    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_pruning(mut self, pruning: Pruning) -> Self {
        self.pruning = pruning;
        self
    }

    fn is_budgeted(&self) -> bool {
        self.move_time.is_some() || self.nodes.is_some()
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(DEFAULT_DEPTH)
    }
}

struct SearchInfo {
    start_time: Instant,
    limits: SearchLimits,
    nodes: u64,
    stopped: bool,
}

impl SearchInfo {
    fn new(limits: SearchLimits) -> Self {
        Self {
            start_time: Instant::now(),
            limits,
            nodes: 0,
            stopped: false,
        }
    }

    fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }

        if let Some(max_nodes) = self.limits.nodes {
            if self.nodes >= max_nodes {
                self.stopped = true;
                return true;
            }
        }

        if self.nodes % TIME_CHECK_INTERVAL == 0 {
            if let Some(move_time) = self.limits.move_time {
                if self.start_time.elapsed() >= move_time {
                    self.stopped = true;
                    return true;
                }
            }
        }

        false
    }
}

/// Scores `board` by minimax with alpha-beta pruning.
///
/// The maximizing ply moves O's markers and the minimizing ply moves X's.
/// Recursion stops at depth zero or as soon as either side is blocked, and
/// the position is then scored by material alone. `board` is mutated while
/// searching and is restored before this returns.
pub fn minimax(board: &mut Board, depth: u8, maximizing: bool, alpha: i32, beta: i32) -> i32 {
    let mut info = SearchInfo::new(SearchLimits::depth(depth));
    alpha_beta(board, depth, maximizing, alpha, beta, &mut info)
}

/// Picks `side`'s move, searching `depth` plies below each candidate.
/// Returns None when `side` has no legal move.
pub fn choose_best_move(board: &Board, side: Side, depth: u8) -> Option<Move> {
    search(board, side, depth).best_move
}

pub fn search(board: &Board, side: Side, depth: u8) -> SearchResult {
    search_with_limits(board, side, SearchLimits::depth(depth))
}

/// Searches on a private copy of `board`.
pub fn search_with_limits(board: &Board, side: Side, limits: SearchLimits) -> SearchResult {
    let mut scratch = board.clone();
    let mut info = SearchInfo::new(limits);

    let mut result = if info.limits.is_budgeted() {
        iterative_deepening(&mut scratch, side, &mut info)
    } else {
        let depth = info.limits.max_depth;
        let (score, best_move) = search_root(&mut scratch, side, depth, &mut info);
        SearchResult {
            best_move,
            score,
            depth,
            nodes: info.nodes,
            stopped: info.stopped,
        }
    };

    debug_assert_eq!(&scratch, board, "search left the board modified");

    if result.best_move.is_none() {
        // A budget can run out before the first candidate is scored
        if let Some(&first) = generate_moves(&scratch, side).iter().next() {
            debug!(%first, "search budget exhausted, falling back to first legal move");
            result.best_move = Some(first);
            result.score = evaluate(&scratch);
        }
    }

    result
}

fn iterative_deepening(board: &mut Board, side: Side, info: &mut SearchInfo) -> SearchResult {
    let mut best_result = SearchResult {
        best_move: None,
        score: evaluate(board),
        depth: 0,
        nodes: 0,
        stopped: false,
    };

    for depth in 1..=info.limits.max_depth {
        let (score, best_move) = search_root(board, side, depth, info);

        // Only keep fully searched depths
        if info.stopped || best_move.is_none() {
            break;
        }

        best_result.best_move = best_move;
        best_result.score = score;
        best_result.depth = depth;
        debug!(
            depth,
            score,
            nodes = info.nodes,
            elapsed_ms = info.start_time.elapsed().as_millis() as u64,
            "iteration complete"
        );
    }

    best_result.nodes = info.nodes;
    best_result.stopped = info.stopped;
    best_result
}

/// Tries every legal move of `side` and keeps the strictly best score:
/// highest for O, lowest for X. Ties go to the earliest move in generation
/// order.
fn search_root(
    board: &mut Board,
    side: Side,
    depth: u8,
    info: &mut SearchInfo,
) -> (i32, Option<Move>) {
    let moves = generate_moves(board, side);
    let maximizing = side.is_maximizing();

    let mut best_move = None;
    let mut best_score = if maximizing { i32::MIN } else { i32::MAX };

    for &mv in moves.iter() {
        board.apply_move(mv);
        let score = alpha_beta(board, depth, !maximizing, i32::MIN, i32::MAX, info);
        board.undo_move(mv);

        if info.stopped {
            break;
        }

        trace!(%mv, score, "root move");

        let improves = if maximizing {
            score > best_score
        } else {
            score < best_score
        };
        if best_move.is_none() || improves {
            best_score = score;
            best_move = Some(mv);
        }
    }

    if best_move.is_none() {
        return (evaluate(board), None);
    }

    (best_score, best_move)
}

fn alpha_beta(
    board: &mut Board,
    depth: u8,
    maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
    info: &mut SearchInfo,
) -> i32 {
    info.nodes += 1;

    if info.should_stop() {
        return evaluate(board);
    }

    // Cutoff: a blocked side is scored by material, not as a loss
    if depth == 0 || !has_any_legal_move(board, Side::X) || !has_any_legal_move(board, Side::O) {
        return evaluate(board);
    }

    let side = if maximizing { Side::O } else { Side::X };
    let moves = generate_moves(board, side);

    let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
    let mut pruned_from: Option<Position> = None;

    for &mv in moves.iter() {
        if pruned_from == Some(mv.from) {
            continue;
        }

        board.apply_move(mv);
        let score = alpha_beta(board, depth - 1, !maximizing, alpha, beta, info);
        board.undo_move(mv);

        if info.stopped {
            return best_score;
        }

        if maximizing {
            best_score = best_score.max(score);
            alpha = alpha.max(best_score);
        } else {
            best_score = best_score.min(score);
            beta = beta.min(best_score);
        }

        if beta <= alpha {
            match info.limits.pruning {
                Pruning::Direction => pruned_from = Some(mv.from),
                Pruning::Full => break,
            }
        }
    }

    best_score
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridstep_core::{is_legal_move, positions, Direction};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_lone_marker_takes_first_direction() {
        let board = Board::from_notation(positions::LONE_CENTRE).unwrap();

        for depth in 1..=DEFAULT_DEPTH {
            let result = search(&board, Side::O, depth);
            assert_eq!(
                result.best_move,
                Some(Move::new(Position::new(3, 3), Position::new(2, 3)))
            );
            // No X markers, so every reply is a cutoff scored 0 - 1
            assert_eq!(result.score, -1);
        }
    }

    #[test]
    fn test_no_legal_move_yields_none() {
        let board = Board::from_notation(positions::X_CORNERED).unwrap();
        assert!(!has_any_legal_move(&board, Side::X));
        assert_eq!(choose_best_move(&board, Side::X, 3), None);

        let result = search(&board, Side::X, 3);
        assert_eq!(result.score, evaluate(&board));
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn test_cutoff_scores_material_when_blocked() {
        let mut board = Board::from_notation(positions::X_CORNERED).unwrap();
        // X is blocked, so the position is scored as it stands
        assert_eq!(minimax(&mut board, 5, true, i32::MIN, i32::MAX), -1);
        assert_eq!(minimax(&mut board, 5, false, i32::MIN, i32::MAX), -1);
    }

    #[test]
    fn test_depth_zero_is_static_evaluation() {
        let mut board = Board::from_notation(positions::CROWDED).unwrap();
        assert_eq!(
            minimax(&mut board, 0, true, i32::MIN, i32::MAX),
            evaluate(&board)
        );
    }

    #[test]
    fn test_minimax_restores_board() {
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..10 {
            let mut board = Board::random(5, 5, &mut rng).unwrap();
            let original = board.clone();
            minimax(&mut board, 3, rng.gen(), i32::MIN, i32::MAX);
            assert_eq!(board, original);
        }
    }

    #[test]
    fn test_chosen_move_is_legal() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            let board = Board::random(4, 4, &mut rng).unwrap();
            for side in [Side::X, Side::O] {
                match choose_best_move(&board, side, 2) {
                    Some(mv) => assert!(is_legal_move(&board, mv, side)),
                    None => assert!(!has_any_legal_move(&board, side)),
                }
            }
        }
    }

    #[test]
    fn test_ties_resolve_in_generation_order() {
        // Material never changes, so every candidate ties and the first
        // generated move must win.
        let mut rng = StdRng::seed_from_u64(44);
        for _ in 0..10 {
            let board = Board::random(3, 3, &mut rng).unwrap();
            for side in [Side::X, Side::O] {
                let first = generate_moves(&board, side).iter().next().copied();
                assert_eq!(choose_best_move(&board, side, 3), first);
            }
        }
    }

    #[test]
    fn test_full_pruning_agrees_with_direction_pruning() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..15 {
            let board = Board::random(rng.gen_range(2..5), rng.gen_range(2..5), &mut rng).unwrap();
            for depth in 0..=3 {
                let direction = search_with_limits(
                    &board,
                    Side::O,
                    SearchLimits::depth(depth).with_pruning(Pruning::Direction),
                );
                let full = search_with_limits(
                    &board,
                    Side::O,
                    SearchLimits::depth(depth).with_pruning(Pruning::Full),
                );
                assert_eq!(direction.best_move, full.best_move);
                assert_eq!(direction.score, full.score);
                assert!(full.nodes <= direction.nodes);
            }
        }
    }

    #[test]
    fn test_full_pruning_visits_fewer_nodes() {
        let board = Board::from_notation(positions::CROWDED).unwrap();
        let direction = search_with_limits(&board, Side::O, SearchLimits::depth(3));
        let full = search_with_limits(
            &board,
            Side::O,
            SearchLimits::depth(3).with_pruning(Pruning::Full),
        );
        assert_eq!(direction.best_move, full.best_move);
        assert!(full.nodes < direction.nodes);
    }

    #[test]
    fn test_direction_pruning_node_counts() {
        // A cutoff only skips the cutting marker's remaining directions, so
        // direction pruning lands strictly between full pruning and none.
        let board = Board::from_notation(positions::CROWDED).unwrap();
        let expected = [(1, 562, 562), (2, 5_732, 1_609), (3, 54_457, 14_371)];

        for (depth, direction_nodes, full_nodes) in expected {
            let direction = search_with_limits(&board, Side::O, SearchLimits::depth(depth));
            let full = search_with_limits(
                &board,
                Side::O,
                SearchLimits::depth(depth).with_pruning(Pruning::Full),
            );

            assert_eq!(direction.nodes, direction_nodes, "depth {depth}");
            assert_eq!(full.nodes, full_nodes, "depth {depth}");
            assert_eq!(
                direction.best_move,
                Some(Move::step(Position::new(0, 1), Direction::Down))
            );
            assert_eq!(direction.score, -1);
        }
    }

    #[test]
    fn test_budgeted_search_starts_at_depth_one() {
        let board = Board::from_notation(positions::LONE_CENTRE).unwrap();
        let result = search_with_limits(
            &board,
            Side::O,
            SearchLimits::move_time(5_000).with_max_depth(1),
        );

        assert_eq!(result.depth, 1);
        // Depth 1 alone: one root move per direction, each a single cutoff node
        assert_eq!(result.nodes, 4);
    }

    #[test]
    fn test_decisive_advantage_sign_is_stable() {
        let board = Board::from_notation(positions::X_AHEAD).unwrap();
        for side in [Side::X, Side::O] {
            let mut signs = Vec::new();
            for depth in 1..=4 {
                let result = search(&board, side, depth);
                assert!(result.best_move.is_some());
                signs.push(result.score.signum());
            }
            assert!(signs.iter().all(|&s| s == 1), "{side}: {signs:?}");
        }
    }

    #[test]
    fn test_node_budget_falls_back_to_first_move() {
        let board = Board::from_notation(positions::CROWDED).unwrap();
        let result = search_with_limits(&board, Side::O, SearchLimits::nodes(1));

        assert!(result.stopped);
        assert_eq!(
            result.best_move,
            generate_moves(&board, Side::O).iter().next().copied()
        );
    }

    #[test]
    fn test_move_time_completes_shallow_depths() {
        let board = Board::from_notation(positions::LONE_CENTRE).unwrap();
        let result = search_with_limits(&board, Side::O, SearchLimits::move_time(5_000));

        assert!(!result.stopped);
        assert_eq!(result.depth, DEFAULT_DEPTH);
        assert_eq!(
            result.best_move,
            Some(Move::step(Position::new(3, 3), Direction::Up))
        );
    }

    #[test]
    fn test_x_side_single_escape() {
        // X at a1 is pinned against O at b1 and can only step right
        let board = Board::from_notation("x6/o6/7/7/7/7/7").unwrap();
        let result = search(&board, Side::X, 2);
        assert_eq!(
            result.best_move,
            Some(Move::step(Position::new(0, 0), Direction::Right))
        );
        assert_eq!(result.score, 0);
    }
}
