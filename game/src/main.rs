//! gridstep - a two-player marker game on a 7x7 grid against a minimax engine

mod config;
mod console;
mod display;
mod game;
mod interactive;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::{EngineArgs, GameConfig, SetupArgs, SideArg};
use console::Console;
use game::Game;
use gridstep_agents::{search_with_limits, Agent, MinimaxAgent, RandomAgent};
use gridstep_core::{perft_detailed, perft_divide, Board, Side};
use interactive::InteractiveGame;
use std::io;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridstep")]
#[command(version, about = "Move your markers, box in the computer's", long_about = None)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer by typing coordinates (default)
    Play(SetupArgs),

    /// Play against the computer in a full-screen terminal board
    Tui(SetupArgs),

    /// Let two agents play each other
    Autoplay(AutoplayArgs),

    /// Search a position and print the chosen move
    Search(SearchArgs),

    /// Count move paths from a position
    Perft(PerftArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    Random,
    Minimax,
}

#[derive(Args)]
struct AutoplayArgs {
    /// Agent playing X (player 1)
    #[arg(long, value_enum, default_value_t = AgentKind::Random)]
    x: AgentKind,

    /// Agent playing O (player 2)
    #[arg(long, value_enum, default_value_t = AgentKind::Minimax)]
    o: AgentKind,

    /// Print only the outcome
    #[arg(short, long)]
    quiet: bool,

    #[command(flatten)]
    setup: SetupArgs,
}

#[derive(Args)]
struct SearchArgs {
    /// Position in board notation, rows a..g separated by '/'
    #[arg(long)]
    board: String,

    /// Side to move
    #[arg(long, value_enum, default_value_t = SideArg::O)]
    side: SideArg,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args)]
struct PerftArgs {
    /// Position in board notation, rows a..g separated by '/'
    #[arg(long)]
    board: String,

    /// Side to move
    #[arg(long, value_enum, default_value_t = SideArg::X)]
    side: SideArg,

    #[arg(long, default_value_t = 3)]
    depth: u8,

    /// Show the count below each first move
    #[arg(long)]
    divide: bool,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => play(SetupArgs::default()),
        Some(Commands::Play(args)) => play(args),
        Some(Commands::Tui(args)) => tui(args),
        Some(Commands::Autoplay(args)) => autoplay(args),
        Some(Commands::Search(args)) => search(args),
        Some(Commands::Perft(args)) => perft(args),
    }
}

fn play(mut args: SetupArgs) -> Result<()> {
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout(), display::stdout_is_terminal());

    if !args.is_complete() {
        let prompts = [
            (&mut args.x_pieces, "Enter the number of pieces for Player 1: "),
            (&mut args.o_pieces, "Enter the number of pieces for Player 2: "),
        ];
        for (slot, prompt) in prompts {
            if slot.is_none() {
                let Some(n) = console.ask_number(prompt)? else {
                    return Ok(());
                };
                *slot = Some(n as usize);
            }
        }
        if args.turns.is_none() {
            let Some(n) = console.ask_number("Enter the turn limit: ")? else {
                return Ok(());
            };
            args.turns = Some(n);
        }
    }

    let config = args.to_config().context("invalid game setup")?;
    let board = config
        .random_board(&mut config.rng())
        .context("could not place the markers")?;
    info!(
        x_pieces = config.x_pieces,
        o_pieces = config.o_pieces,
        turn_limit = config.turn_limit,
        "new game"
    );

    let mut game = Game::new(board, config.turn_limit);
    let mut engine = MinimaxAgent::with_limits(config.limits.clone());
    console.run(&mut game, &mut engine)?;
    Ok(())
}

fn tui(args: SetupArgs) -> Result<()> {
    let config = args.to_config().context("invalid game setup")?;
    let mut ui = InteractiveGame::new(config)?;
    ui.run()
}

fn make_agent(kind: AgentKind, config: &GameConfig, seed: Option<u64>) -> Box<dyn Agent> {
    match kind {
        AgentKind::Minimax => Box::new(MinimaxAgent::with_limits(config.limits.clone())),
        AgentKind::Random => match seed {
            Some(seed) => Box::new(RandomAgent::seeded(seed)),
            None => Box::new(RandomAgent::new()),
        },
    }
}

fn autoplay(args: AutoplayArgs) -> Result<()> {
    let config = args.setup.to_config().context("invalid game setup")?;
    let board = config
        .random_board(&mut config.rng())
        .context("could not place the markers")?;

    // Distinct streams for the two random agents
    let mut x = make_agent(args.x, &config, config.seed);
    let mut o = make_agent(args.o, &config, config.seed.map(|s| s.wrapping_add(1)));

    let coloured = display::stdout_is_terminal();
    if !args.quiet {
        print!("{}", display::render_board(&board, coloured));
    }

    let mut game = Game::new(board, config.turn_limit);
    let quiet = args.quiet;
    let outcome = game.play_out(x.as_mut(), o.as_mut(), |turn, side, mv| {
        if !quiet {
            println!("Turn {turn}: player {} ({side}) moves {mv}", side.player_number());
        }
    })?;

    if !quiet {
        println!();
        print!("{}", display::render_board(game.board(), coloured));
    }
    println!("{outcome}");
    Ok(())
}

fn parse_board(notation: &str) -> Result<Board> {
    Board::from_notation(notation).with_context(|| format!("could not parse board '{notation}'"))
}

fn search(args: SearchArgs) -> Result<()> {
    let board = parse_board(&args.board)?;
    let side = Side::from(args.side);
    let limits = args.engine.limits();

    print!("{}", display::render_board(&board, display::stdout_is_terminal()));
    println!(
        "Searching for player {} ({side}), depth {}...",
        side.player_number(),
        limits.max_depth
    );

    let start = Instant::now();
    let result = search_with_limits(&board, side, limits);
    let elapsed = start.elapsed();

    let Some(best_move) = result.best_move else {
        println!("No legal moves available");
        return Ok(());
    };

    println!("\nBest move: {best_move}");
    println!("Score: {}", result.score);
    println!("Depth: {}", result.depth);
    println!("Nodes: {}", result.nodes);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    if result.stopped {
        println!("(search stopped by its budget)");
    }
    Ok(())
}

fn perft(args: PerftArgs) -> Result<()> {
    let mut board = parse_board(&args.board)?;
    let side = Side::from(args.side);
    if board.occupied() == 0 {
        bail!("the board has no markers");
    }

    println!("Running perft({}) for {side}...", args.depth);
    println!("Position: {}", board.to_notation());

    let start = Instant::now();
    if args.divide {
        let mut total = 0;
        for (mv, count) in perft_divide(&mut board, side, args.depth) {
            println!("{mv}: {count}");
            total += count;
        }
        println!("\nTotal: {total}");
    } else {
        let results = perft_detailed(&mut board, side, args.depth);
        let elapsed = start.elapsed();
        println!("Nodes: {}", results.nodes);
        println!("Blocked leaves: {}", results.blocked);
        println!("Time: {:.2}s", elapsed.as_secs_f64());
    }
    Ok(())
}
