use gridstep_agents::{Agent, Evaluatable};
use gridstep_core::{check_move, has_any_legal_move, Board, Move, MoveError, Side};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("{agent} returned no move for player {side} although one exists")]
    AgentPassed { agent: String, side: Side },

    #[error("the game is already over: {0}")]
    Finished(Outcome),
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The loser had no legal move.
    Win { winner: Side },
    /// The turn limit ran out; `score` is X's material minus O's.
    TurnLimit { score: i32 },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win { winner } => write!(
                f,
                "player {} ({}) wins, player {} has no valid moves",
                winner.player_number(),
                winner,
                winner.opponent().player_number()
            ),
            Outcome::TurnLimit { score } => {
                write!(f, "turn limit reached with material score {score:+}")
            }
        }
    }
}

/// Authoritative game state: board, side to move and turn counter.
/// X always moves first.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    to_move: Side,
    turn: u32,
    turn_limit: u32,
    history: Vec<Move>,
}

impl Game {
    pub fn new(board: Board, turn_limit: u32) -> Self {
        Self {
            board,
            to_move: Side::X,
            turn: 1,
            turn_limit,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// Number of the turn about to be played, starting at 1.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn turn_limit(&self) -> u32 {
        self.turn_limit
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns the outcome if the game is over.
    /// A blocked X is checked before a blocked O.
    pub fn outcome(&self) -> Option<Outcome> {
        if !has_any_legal_move(&self.board, Side::X) {
            Some(Outcome::Win { winner: Side::O })
        } else if !has_any_legal_move(&self.board, Side::O) {
            Some(Outcome::Win { winner: Side::X })
        } else if self.turn > self.turn_limit {
            Some(Outcome::TurnLimit {
                score: self.board.evaluate(),
            })
        } else {
            None
        }
    }

    /// Plays `mv` for the side to move.
    pub fn play_move(&mut self, mv: Move) -> Result<(), GameError> {
        if let Some(outcome) = self.outcome() {
            return Err(GameError::Finished(outcome));
        }
        check_move(&self.board, mv, self.to_move)?;

        self.board.apply_move(mv);
        self.history.push(mv);
        debug!(turn = self.turn, side = %self.to_move, %mv, "move played");

        self.to_move = self.to_move.opponent();
        self.turn += 1;
        Ok(())
    }

    /// Takes back the last move, if any.
    pub fn undo(&mut self) -> Option<Move> {
        let mv = self.history.pop()?;
        self.board.undo_move(mv);
        self.to_move = self.to_move.opponent();
        self.turn -= 1;
        Some(mv)
    }

    /// Asks `agent` for the side to move and plays its choice.
    pub fn play_agent(&mut self, agent: &mut dyn Agent) -> Result<Move, GameError> {
        let side = self.to_move;
        let mv = agent
            .select_move(&self.board, side)
            .ok_or_else(|| GameError::AgentPassed {
                agent: agent.name().to_string(),
                side,
            })?;
        self.play_move(mv)?;
        Ok(mv)
    }

    /// Lets two agents play until the game ends. `on_move` sees each turn
    /// number, the mover and its move.
    pub fn play_out(
        &mut self,
        x: &mut dyn Agent,
        o: &mut dyn Agent,
        mut on_move: impl FnMut(u32, Side, Move),
    ) -> Result<Outcome, GameError> {
        info!(x = x.name(), o = o.name(), "game start");

        loop {
            if let Some(outcome) = self.outcome() {
                info!(%outcome, turns = self.history.len(), "game over");
                return Ok(outcome);
            }

            let (turn, side) = (self.turn, self.to_move);
            let agent: &mut dyn Agent = match side {
                Side::X => &mut *x,
                Side::O => &mut *o,
            };
            let mv = self.play_agent(agent)?;
            on_move(turn, side, mv);
        }
    }
}
