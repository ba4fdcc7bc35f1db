use crate::{
    search::{search_with_limits, Pruning, SearchLimits, SearchResult},
    Agent,
};
use gridstep_core::{Board, Move, Side};
use tracing::info;

pub struct MinimaxAgent {
    name: String,
    limits: SearchLimits,
    last_result: Option<SearchResult>,
}

impl MinimaxAgent {
    pub fn new(depth: u8) -> Self {
        Self::with_limits(SearchLimits::depth(depth))
    }

    pub fn with_time_limit(time_ms: u64) -> Self {
        Self::with_limits(SearchLimits::move_time(time_ms))
    }

    pub fn with_limits(limits: SearchLimits) -> Self {
        let name = match limits.move_time {
            Some(time) => format!("Minimax(time={}ms)", time.as_millis()),
            None => format!("Minimax(depth={})", limits.max_depth),
        };
        MinimaxAgent {
            name,
            limits,
            last_result: None,
        }
    }

    pub fn pruning(mut self, pruning: Pruning) -> Self {
        self.limits.pruning = pruning;
        self
    }

    /// Result of the most recent search, kept for reporting.
    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last_result.as_ref()
    }
}

impl Agent for MinimaxAgent {
    fn select_move(&mut self, board: &Board, side: Side) -> Option<Move> {
        let result = search_with_limits(board, side, self.limits.clone());
        if let Some(mv) = result.best_move {
            info!(
                agent = %self.name,
                %side,
                %mv,
                score = result.score,
                depth = result.depth,
                nodes = result.nodes,
                "search finished"
            );
        }
        let best_move = result.best_move;
        self.last_result = Some(result);
        best_move
    }

    fn name(&self) -> &str {
        &self.name
    }
}
