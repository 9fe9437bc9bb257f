//! Player identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named tournament participant.
///
/// Players compare and hash by name only (case-sensitive). The player with an
/// empty name is the placeholder used to even out an odd field; whoever is
/// paired against it has a bye for that round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Player {
    name: String,
}

impl Player {
    /// Create a player with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The placeholder player standing in for "no opponent".
    pub fn placeholder() -> Self {
        Self {
            name: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_placeholder() {
            write!(f, "(bye)")
        } else {
            write!(f, "{}", self.name)
        }
    }
}

impl From<&str> for Player {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Player {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
