//! Line-based front end: the human types coordinates like "a3".

use crate::display::render_board;
use crate::game::{Game, Outcome};
use anyhow::{Context, Result};
use gridstep_agents::Agent;
use gridstep_core::{check_move, Board, Direction, Move, Position, Side};
use std::io::{BufRead, Write};
use tracing::info;

pub struct Console<R, W> {
    input: R,
    output: W,
    coloured: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, coloured: bool) -> Self {
        Self {
            input,
            output,
            coloured,
        }
    }

    /// Prints `prompt` and reads one trimmed line. None on end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks until a non-negative number is entered.
    pub fn ask_number(&mut self, prompt: &str) -> Result<Option<u32>> {
        while let Some(answer) = self.ask(prompt)? {
            match answer.parse() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => writeln!(self.output, "Please enter a whole number.")?,
            }
        }
        Ok(None)
    }

    /// Reads the human's move: first a piece, then its destination.
    /// Re-prompts until both are acceptable. None on end of input.
    pub fn ask_human_move(&mut self, board: &Board, side: Side) -> Result<Option<Move>> {
        let from = loop {
            let Some(answer) = self.ask("Choose piece to move: ")? else {
                return Ok(None);
            };
            let from: Position = match answer.parse() {
                Ok(pos) => pos,
                Err(e) => {
                    writeln!(self.output, "{e}")?;
                    continue;
                }
            };
            if !board.is_side(from, side) {
                writeln!(self.output, "There is no piece of yours at {from}.")?;
                continue;
            }
            if !Direction::ALL.iter().any(|&d| board.is_empty(from.step(d))) {
                writeln!(self.output, "The piece at {from} cannot move.")?;
                continue;
            }
            break from;
        };

        loop {
            let prompt = format!("Choose the new position for {from}: ");
            let Some(answer) = self.ask(&prompt)? else {
                return Ok(None);
            };
            let to: Position = match answer.parse() {
                Ok(pos) => pos,
                Err(e) => {
                    writeln!(self.output, "{e}")?;
                    continue;
                }
            };
            let mv = Move::new(from, to);
            match check_move(board, mv, side) {
                Ok(()) => return Ok(Some(mv)),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    /// Runs the turn loop with the human on X and `engine` on O.
    /// Returns None if input ended before the game did.
    pub fn run(&mut self, game: &mut Game, engine: &mut dyn Agent) -> Result<Option<Outcome>> {
        loop {
            if let Some(outcome) = game.outcome() {
                writeln!(self.output)?;
                if matches!(outcome, Outcome::TurnLimit { .. }) {
                    write!(self.output, "{}", render_board(game.board(), self.coloured))?;
                }
                writeln!(self.output, "{}", describe_outcome(outcome))?;
                info!(%outcome, "game over");
                return Ok(Some(outcome));
            }

            writeln!(self.output, "\nTurn {}:", game.turn())?;
            write!(self.output, "{}", render_board(game.board(), self.coloured))?;

            match game.to_move() {
                Side::X => {
                    let Some(mv) = self.ask_human_move(game.board(), Side::X)? else {
                        return Ok(None);
                    };
                    game.play_move(mv)?;
                    writeln!(
                        self.output,
                        "Player moves the piece at {} to {}",
                        mv.from, mv.to
                    )?;
                }
                Side::O => {
                    let mv = game
                        .play_agent(engine)
                        .with_context(|| format!("{} failed to move", engine.name()))?;
                    writeln!(
                        self.output,
                        "Computer moves the piece at {} to {}",
                        mv.from, mv.to
                    )?;
                }
            }
        }
    }
}

/// Wording of the end-of-game line for a human against the computer.
pub fn describe_outcome(outcome: Outcome) -> String {
    match outcome {
        Outcome::Win { winner: Side::O } => {
            "Player 2 (Computer) wins! Player 1 has no valid moves.".to_string()
        }
        Outcome::Win { winner: Side::X } => {
            "Player 1 wins! Player 2 (Computer) has no valid moves.".to_string()
        }
        Outcome::TurnLimit { score } => {
            format!("Turn limit reached, no winner. Material score {score:+}.")
        }
    }
}
