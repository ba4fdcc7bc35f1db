use crossterm::style::{style, Color as TermColor, Stylize};
use crossterm::tty::IsTty;
use gridstep_core::{Board, Position, Side, BOARD_SIZE};
use std::io;

/// Returns true if stdout is a terminal and markers should be coloured.
pub fn stdout_is_terminal() -> bool {
    io::stdout().is_tty()
}

fn side_colour(side: Side) -> TermColor {
    match side {
        Side::X => TermColor::Cyan,
        Side::O => TermColor::Magenta,
    }
}

/// Renders the board with column numbers on top and row letters down the
/// left, e.g. the cell "a3" is the third cell of the first line.
pub fn render_board(board: &Board, coloured: bool) -> String {
    let mut out = String::from("  ");
    for col in 1..=BOARD_SIZE {
        out.push_str(&format!("{col} "));
    }
    out.push('\n');

    for row in 0..BOARD_SIZE {
        out.push((b'a' + row as u8) as char);
        out.push(' ');
        for col in 0..BOARD_SIZE {
            let cell = match board.piece_at(Position::new(row, col)) {
                Some(side) if coloured => {
                    let styled = style(side.symbol()).with(side_colour(side)).bold();
                    format!("{styled} ")
                }
                Some(side) => format!("{} ", side.symbol()),
                None => String::from(". "),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }

    out
}
