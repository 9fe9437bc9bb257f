//! Pairing model: one scored game between two players in a round.

use serde::{Deserialize, Serialize};

use super::{Player, TournamentError};

/// A single game pairing between two players.
///
/// The first/second slot order is for display only. The two slots never hold
/// the same player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    player1: Player,
    player2: Player,

    #[serde(default)]
    p1_score: i32,

    #[serde(default)]
    p2_score: i32,
}

impl Pairing {
    /// Create a new unscored pairing.
    pub fn new(player1: Player, player2: Player) -> Result<Self, TournamentError> {
        if player1 == player2 {
            return Err(TournamentError::InvalidInput(format!(
                "player '{}' cannot be paired against themselves",
                player1.name()
            )));
        }

        Ok(Self {
            player1,
            player2,
            p1_score: 0,
            p2_score: 0,
        })
    }

    pub fn player1(&self) -> &Player {
        &self.player1
    }

    pub fn player2(&self) -> &Player {
        &self.player2
    }

    pub fn p1_score(&self) -> i32 {
        self.p1_score
    }

    pub fn p2_score(&self) -> i32 {
        self.p2_score
    }

    /// Record the result, replacing both scores at once.
    pub fn set_score(&mut self, p1_score: i32, p2_score: i32) {
        self.p1_score = p1_score;
        self.p2_score = p2_score;
    }

    pub fn contains(&self, player: &Player) -> bool {
        self.player1 == *player || self.player2 == *player
    }

    /// True if every given player sits in this pairing.
    pub fn contains_players(&self, players: &[&Player]) -> bool {
        players.iter().all(|p| self.contains(p))
    }

    /// True if one of the slots holds the placeholder player.
    pub fn involves_placeholder(&self) -> bool {
        self.player1.is_placeholder() || self.player2.is_placeholder()
    }

    /// Get the player on the other side of the board.
    pub fn opponent(&self, player: &Player) -> Result<&Player, TournamentError> {
        if self.player1 == *player {
            Ok(&self.player2)
        } else if self.player2 == *player {
            Ok(&self.player1)
        } else {
            Err(TournamentError::NotFound(format!(
                "player '{}' does not exist in this pairing",
                player.name()
            )))
        }
    }

    /// Score recorded for the given player, if they are in this pairing.
    pub fn score_of(&self, player: &Player) -> Option<i32> {
        if self.player1 == *player {
            Some(self.p1_score)
        } else if self.player2 == *player {
            Some(self.p2_score)
        } else {
            None
        }
    }

    /// Put `replacement` into whichever slot `initial` occupies.
    pub fn replace_player(
        &mut self,
        initial: &Player,
        replacement: Player,
    ) -> Result<(), TournamentError> {
        let (slot, other) = if self.player1 == *initial {
            (&mut self.player1, &self.player2)
        } else if self.player2 == *initial {
            (&mut self.player2, &self.player1)
        } else {
            return Err(TournamentError::NotFound(format!(
                "player '{}' does not exist in this pairing",
                initial.name()
            )));
        };

        if replacement == *other {
            return Err(TournamentError::InvalidInput(format!(
                "player '{}' cannot be paired against themselves",
                replacement.name()
            )));
        }

        *slot = replacement;
        Ok(())
    }
}
