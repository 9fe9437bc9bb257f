//! Errors raised by the tournament model and the pairing generators.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while building pairings or reading results.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TournamentError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Swiss pairing did not complete within {0:?}")]
    Timeout(Duration),

    #[error("Player '{0}' appears in more than one pairing of the round")]
    DuplicatePlayer(String),
}

impl TournamentError {
    /// Returns true if the caller may retry with relaxed constraints.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TournamentError::Timeout(_))
    }
}
