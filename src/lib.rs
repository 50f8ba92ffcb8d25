// Library interface for break-the-code-helper
// This allows integration tests to access internal modules

pub mod board;
pub mod cli;
pub mod error;
pub mod generator;
pub mod hand;
pub mod hints;
pub mod history;
pub mod logging;
pub mod scorer;
pub mod session;
pub mod tile;
pub mod tui;

// Re-export commonly used items for easier testing
pub use board::{Board, BoardSnapshot};
pub use error::{BoardError, HintError, HistoryError, ValidationError};
pub use hand::{Hand, Slots};
pub use hints::{Answer, AnswerKind, Hint, catalog, find_hint};
pub use scorer::Simulation;
pub use session::{Agent, CheckResult, GameInterface, Session, UserAction, game_loop};
pub use tile::{PlayerCount, TileId, encode_hand, parse_tile};
