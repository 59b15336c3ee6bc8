//! Error types for the editing engine
//!
//! Most failures inside the engine are recovered locally (stale offsets are
//! clamped, unknown markup degrades to text, unsupported commands are no-ops).
//! The variants here are what remains visible to the embedding application.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Position is out of bounds
    #[error("Position {position} out of bounds (length: {length})")]
    PositionOutOfBounds { position: usize, length: usize },

    /// Range is out of bounds or reversed
    #[error("Range {start}..{end} out of bounds (length: {length})")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        length: usize,
    },

    /// Username cannot be rendered as a mention token
    #[error("Invalid username: {0:?}")]
    InvalidUsername(String),

    /// Edit would push the plain-text projection past `max_length`
    #[error("Edit needs {required} characters but max length is {max_length}")]
    MaxLengthExceeded { required: usize, max_length: usize },

    /// Invalid editor configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}
