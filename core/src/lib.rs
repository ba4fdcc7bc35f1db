pub mod board;
pub mod move_gen;
pub mod notation;
pub mod perft;
pub mod types;

pub use board::*;
pub use move_gen::*;
pub use notation::{positions, NotationError};
pub use perft::{perft, perft_detailed, perft_divide, PerftResults};
pub use types::*;
