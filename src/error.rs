use thiserror::Error;

use crate::hints::AnswerKind;

/// Malformed construction input. Raised before any engine state exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("a game has 2 to 4 players, not {0}")]
    InvalidPlayerCount(u8),
    #[error("expected exactly {expected} tiles, got {got}")]
    WrongTileCount { expected: usize, got: usize },
    #[error("tile '{0}' is not recognized as a valid tile")]
    UnknownTile(String),
    #[error("tile '{0}' appears more than once (only the 5 tile can be specified twice)")]
    DuplicateTile(String),
    #[error("tile '{0}' is already held by another hand")]
    TileTaken(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HintError {
    #[error("the hint '{0}' is not valid")]
    UnknownHint(String),
    #[error("expected one answer per opponent ({expected}), got {got}")]
    AnswerCount { expected: usize, got: usize },
    #[error("hint '{code}' expects a {expected} answer")]
    AnswerShape {
        code: &'static str,
        expected: AnswerKind,
    },
    #[error("'{input}' is not a valid answer to hint '{code}'")]
    InvalidAnswer { code: &'static str, input: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("there is no opponent #{index} (the game has {count})")]
    NoSuchOpponent { index: usize, count: usize },
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Hint(#[from] HintError),
}
