//! Error types shared by the engine and the games.
//!
//! Every failure in this crate is a configuration or resource error: a state
//! or screen that was never registered, a duplicated key, a missing asset, a
//! malformed level file. None of them is recoverable at runtime; they
//! propagate with `?` up to `main`, which logs them and exits with status 1.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by [`StateMachine`](crate::components::statemachine::StateMachine).
///
/// Keys are stored in their `Debug` form so the error stays `'static` and
/// independent of the machine's key type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateMachineError {
    /// A transition targeted a key that was never registered on this machine.
    #[error("state {0} is not registered on this machine")]
    Unregistered(String),
    /// Two states were registered under the same key.
    #[error("state {0} is registered twice")]
    Duplicate(String),
}

/// Top level error for the game loop, the screens and the backend.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("screen {0} is not registered")]
    UnknownScreen(String),

    #[error("screen {0} is registered twice")]
    DuplicateScreen(String),

    #[error(transparent)]
    StateMachine(#[from] StateMachineError),

    #[error("failed to load asset '{key}' from {path}: {reason}")]
    Asset {
        key: String,
        path: PathBuf,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed level file: {0}")]
    Level(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("pipe board must be at least 3x3, got {0}x{0}")]
    BoardTooSmall(usize),

    #[error("invalid pipe board: {0}")]
    InvalidBoard(String),
}
