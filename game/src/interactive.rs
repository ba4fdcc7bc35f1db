use crate::config::GameConfig;
use crate::game::{Game, Outcome};
use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    style::{Color as TermColor, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
    ExecutableCommand,
};
use gridstep_agents::{Agent, MinimaxAgent};
use gridstep_core::{generate_moves, Move, Position, Side, BOARD_SIZE};
use rand::rngs::StdRng;
use std::io::{self, Write};
use tracing::debug;

/// Cursor-driven game: the human plays X against the engine on O.
pub struct InteractiveGame {
    config: GameConfig,
    rng: StdRng,
    game: Game,
    engine: MinimaxAgent,
    cursor_pos: Position,
    selected: Option<Position>,
    targets: Vec<Move>,
    message: String,
}

impl InteractiveGame {
    pub fn new(config: GameConfig) -> Result<Self> {
        let mut rng = config.rng();
        let board = config.random_board(&mut rng)?;
        let game = Game::new(board, config.turn_limit);
        let engine = MinimaxAgent::with_limits(config.limits.clone());

        Ok(Self {
            config,
            rng,
            game,
            engine,
            cursor_pos: Position::new(BOARD_SIZE / 2, BOARD_SIZE / 2),
            selected: None,
            targets: Vec::new(),
            message: String::from("Use hjkl to move, Enter to select/move, q to quit"),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(Hide)?;
        stdout.execute(Clear(ClearType::All))?;

        let result = self.game_loop();

        stdout.execute(Show)?;
        terminal::disable_raw_mode()?;
        stdout.execute(Clear(ClearType::All))?;
        stdout.execute(MoveTo(0, 0))?;

        result
    }

    fn game_loop(&mut self) -> Result<()> {
        loop {
            if let Some(outcome) = self.game.outcome() {
                self.message = format!(
                    "{}. Press n for a new game, q to quit",
                    game_over_text(outcome)
                );
            }
            self.draw_board()?;

            let Event::Key(KeyEvent { code, kind, .. }) = event::read()? else {
                continue;
            };
            if kind != KeyEventKind::Press {
                continue;
            }

            match code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(0, -1),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1, 0),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1, 0),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(0, 1),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if self.handle_selection() {
                        self.engine_move()?;
                    }
                }
                KeyCode::Char('u') => self.undo_move(),
                KeyCode::Char('n') => self.new_game()?,
                _ => {}
            }
        }

        Ok(())
    }

    fn move_cursor(&mut self, drow: i8, dcol: i8) {
        let next = Position::new(self.cursor_pos.row + drow, self.cursor_pos.col + dcol);
        if next.is_on_board() {
            self.cursor_pos = next;
        }
    }

    /// Selects a piece or moves the selected one to the cursor.
    /// Returns true if the human made a move.
    fn handle_selection(&mut self) -> bool {
        if self.game.outcome().is_some() || self.game.to_move() != Side::X {
            return false;
        }
        let cursor = self.cursor_pos;

        if self.selected.take().is_some() {
            let chosen = self.targets.iter().find(|m| m.to == cursor).copied();
            self.targets.clear();

            if let Some(mv) = chosen {
                if let Err(e) = self.game.play_move(mv) {
                    self.message = e.to_string();
                    return false;
                }
                self.message = format!("Player moves the piece at {} to {}", mv.from, mv.to);
                return true;
            }
        }

        if self.game.board().is_side(cursor, Side::X) {
            let moves = generate_moves(self.game.board(), Side::X);
            self.targets = moves.iter().filter(|m| m.from == cursor).copied().collect();

            if self.targets.is_empty() {
                self.message = format!("The piece at {cursor} cannot move");
            } else {
                self.selected = Some(cursor);
                self.message = format!("Selected piece at {cursor}");
            }
        }

        false
    }

    fn engine_move(&mut self) -> Result<()> {
        if self.game.outcome().is_some() {
            return Ok(());
        }
        self.message = String::from("Engine thinking...");
        self.draw_board()?;

        let mv = self.game.play_agent(&mut self.engine)?;
        if let Some(result) = self.engine.last_result() {
            debug!(depth = result.depth, nodes = result.nodes, "engine search done");
        }
        self.message = format!("Computer moves the piece at {} to {}", mv.from, mv.to);
        Ok(())
    }

    /// Takes back moves until it is the human's turn again: the engine's
    /// reply and the human move before it, or just the human move when that
    /// ended the game.
    fn undo_move(&mut self) {
        let plies = if self.game.to_move() == Side::X { 2 } else { 1 };
        if self.game.history().len() >= plies {
            for _ in 0..plies {
                self.game.undo();
            }
            self.selected = None;
            self.targets.clear();
            self.message = String::from("Undid last move");
        } else {
            self.message = String::from("Nothing to undo");
        }
    }

    fn new_game(&mut self) -> Result<()> {
        let board = self.config.random_board(&mut self.rng)?;
        self.game = Game::new(board, self.config.turn_limit);
        self.selected = None;
        self.targets.clear();
        self.cursor_pos = Position::new(BOARD_SIZE / 2, BOARD_SIZE / 2);
        self.message = String::from("New game started!");
        Ok(())
    }

    fn draw_board(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.execute(MoveTo(0, 0))?;
        stdout.execute(Clear(ClearType::FromCursorDown))?;

        print!("Gridstep - Interactive Mode (vim keys: hjkl)\r\n");
        print!("Commands: Enter=select/move, u=undo, n=new, q=quit\r\n");
        print!("\r\n");

        print!("    1 2 3 4 5 6 7\r\n");
        print!("  ┌───────────────┐\r\n");

        for row in 0..BOARD_SIZE {
            print!("{} │ ", (b'a' + row as u8) as char);

            for col in 0..BOARD_SIZE {
                let pos = Position::new(row, col);
                let is_cursor = self.cursor_pos == pos;
                let is_selected = self.selected == Some(pos);
                let is_target = self.targets.iter().any(|m| m.to == pos);

                if is_cursor {
                    stdout.execute(SetBackgroundColor(TermColor::Yellow))?;
                } else if is_selected {
                    stdout.execute(SetBackgroundColor(TermColor::Green))?;
                } else if is_target {
                    stdout.execute(SetBackgroundColor(TermColor::Blue))?;
                }

                match self.game.board().piece_at(pos) {
                    Some(side) => {
                        let colour = match side {
                            Side::X => TermColor::Cyan,
                            Side::O => TermColor::Magenta,
                        };
                        stdout.execute(SetForegroundColor(colour))?;
                        print!("{} ", side.symbol());
                    }
                    None => print!(". "),
                }

                stdout.execute(ResetColor)?;
            }

            print!("│\r\n");
        }

        print!("  └───────────────┘\r\n");
        print!("\r\n");

        print!(
            "Player {} ({}) to move | Turn {} of {}\r\n",
            self.game.to_move().player_number(),
            self.game.to_move(),
            self.game.turn().min(self.game.turn_limit()),
            self.game.turn_limit()
        );
        print!("\r\n");
        print!("{}\r\n", self.message);

        stdout.flush()
    }
}

fn game_over_text(outcome: Outcome) -> String {
    match outcome {
        Outcome::Win { winner: Side::X } => {
            String::from("You win! The computer has no valid moves")
        }
        Outcome::Win { winner: Side::O } => {
            String::from("The computer wins! You have no valid moves")
        }
        Outcome::TurnLimit { score } => {
            format!("Turn limit reached, no winner (material {score:+})")
        }
    }
}
