//! Command-line arguments and the game configuration built from them

use clap::{Args, ValueEnum};
use gridstep_agents::{Pruning, SearchLimits, DEFAULT_DEPTH};
use gridstep_core::{Board, BoardError, Side, CELL_COUNT};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

/// Turn limit used when none is given.
pub const DEFAULT_TURN_LIMIT: u32 = 50;

/// Pieces per side used by the non-prompting front ends.
pub const DEFAULT_PIECES: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("player {} needs at least one piece", .0.player_number())]
    NoPieces(Side),

    #[error("{requested} pieces do not fit on a board with {capacity} cells")]
    TooManyPieces { requested: usize, capacity: usize },

    #[error("the turn limit must be at least 1")]
    ZeroTurnLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PruningArg {
    /// Skip only the remaining directions of the cutting marker
    Direction,
    /// Skip the rest of the ply
    Full,
}

impl From<PruningArg> for Pruning {
    fn from(arg: PruningArg) -> Self {
        match arg {
            PruningArg::Direction => Pruning::Direction,
            PruningArg::Full => Pruning::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    X,
    O,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::X => Side::X,
            SideArg::O => Side::O,
        }
    }
}

/// Search settings shared by every command that runs the engine
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Search depth in plies below each candidate move [default: 8]
    #[arg(long)]
    pub depth: Option<u8>,

    /// Time budget per engine move in milliseconds (iterative deepening)
    #[arg(long)]
    pub movetime: Option<u64>,

    /// Pruning mode after an alpha-beta cutoff [default: direction]
    #[arg(long, value_enum)]
    pub pruning: Option<PruningArg>,
}

impl EngineArgs {
    pub fn limits(&self) -> SearchLimits {
        let depth = self.depth.unwrap_or(DEFAULT_DEPTH);
        let limits = match self.movetime {
            Some(ms) => SearchLimits::move_time(ms).with_max_depth(depth),
            None => SearchLimits::depth(depth),
        };
        limits.with_pruning(self.pruning.map(Pruning::from).unwrap_or_default())
    }
}

/// Game setup; anything left out is asked for (play) or defaulted
#[derive(Args, Debug, Clone, Default)]
pub struct SetupArgs {
    /// Number of pieces for player 1 (X)
    #[arg(long)]
    pub x_pieces: Option<usize>,

    /// Number of pieces for player 2 (O)
    #[arg(long)]
    pub o_pieces: Option<usize>,

    /// Maximum number of turns (one move each)
    #[arg(long)]
    pub turns: Option<u32>,

    /// Random seed for the initial placement
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

impl SetupArgs {
    /// Returns true if every setup number was given on the command line.
    pub fn is_complete(&self) -> bool {
        self.x_pieces.is_some() && self.o_pieces.is_some() && self.turns.is_some()
    }

    /// Builds a config, filling missing values with defaults.
    pub fn to_config(&self) -> Result<GameConfig, ConfigError> {
        let config = GameConfig {
            x_pieces: self.x_pieces.unwrap_or(DEFAULT_PIECES),
            o_pieces: self.o_pieces.unwrap_or(DEFAULT_PIECES),
            turn_limit: self.turns.unwrap_or(DEFAULT_TURN_LIMIT),
            limits: self.engine.limits(),
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Everything needed to set up and run one game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub x_pieces: usize,
    pub o_pieces: usize,
    pub turn_limit: u32,
    pub limits: SearchLimits,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            x_pieces: DEFAULT_PIECES,
            o_pieces: DEFAULT_PIECES,
            turn_limit: DEFAULT_TURN_LIMIT,
            limits: SearchLimits::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.x_pieces == 0 {
            return Err(ConfigError::NoPieces(Side::X));
        }
        if self.o_pieces == 0 {
            return Err(ConfigError::NoPieces(Side::O));
        }
        let requested = self.x_pieces + self.o_pieces;
        if requested > CELL_COUNT {
            return Err(ConfigError::TooManyPieces {
                requested,
                capacity: CELL_COUNT,
            });
        }
        if self.turn_limit == 0 {
            return Err(ConfigError::ZeroTurnLimit);
        }
        Ok(())
    }

    /// Random source for this game: seeded when a seed is configured.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn random_board(&self, rng: &mut StdRng) -> Result<Board, BoardError> {
        Board::random(self.x_pieces, self.o_pieces, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SetupArgs::default().to_config().unwrap();
        assert_eq!(config.x_pieces, DEFAULT_PIECES);
        assert_eq!(config.turn_limit, DEFAULT_TURN_LIMIT);
        assert_eq!(config.limits.max_depth, DEFAULT_DEPTH);
        assert_eq!(config.limits.pruning, Pruning::Direction);
        assert!(config.limits.move_time.is_none());
    }

    #[test]
    fn test_engine_args() {
        let args = EngineArgs {
            depth: Some(4),
            movetime: Some(300),
            pruning: Some(PruningArg::Full),
        };
        let limits = args.limits();
        assert_eq!(limits.max_depth, 4);
        assert_eq!(limits.move_time.map(|d| d.as_millis()), Some(300));
        assert_eq!(limits.pruning, Pruning::Full);
    }

    #[test]
    fn test_validation() {
        let mut config = GameConfig::default();
        assert!(config.validate().is_ok());

        config.x_pieces = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoPieces(Side::X)));

        config.x_pieces = 30;
        config.o_pieces = 20;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyPieces {
                requested: 50,
                capacity: 49
            })
        );

        config.o_pieces = 19;
        config.turn_limit = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTurnLimit));
    }

    #[test]
    fn test_seeded_boards_repeat() {
        let config = GameConfig {
            seed: Some(5),
            ..GameConfig::default()
        };
        let a = config.random_board(&mut config.rng()).unwrap();
        let b = config.random_board(&mut config.rng()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.count(Side::X), DEFAULT_PIECES);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::NoPieces(Side::O).to_string(),
            "player 2 needs at least one piece"
        );
    }
}
