//! Round model: the pairings played in one round.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{sort_standings, Pairing, Player, Standing, TournamentError};

/// One round of play. Empty until pairings are assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    #[serde(default)]
    pairings: Vec<Pairing>,
}

impl Round {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pairings(&self) -> &[Pairing] {
        &self.pairings
    }

    /// Mutable access for score entry.
    pub fn pairings_mut(&mut self) -> &mut [Pairing] {
        &mut self.pairings
    }

    /// Replace this round's pairings.
    pub fn set_pairings(&mut self, pairings: Vec<Pairing>) {
        self.pairings = pairings;
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.pairings.clear();
    }

    /// Per-round standings, highest score first.
    ///
    /// Ties keep pairing order (first slot before second).
    pub fn standings(&self) -> Result<Vec<Standing>, TournamentError> {
        let mut seen = HashSet::with_capacity(self.pairings.len() * 2);
        let mut standings = Vec::with_capacity(self.pairings.len() * 2);

        for pairing in &self.pairings {
            for (player, score) in [
                (pairing.player1(), pairing.p1_score()),
                (pairing.player2(), pairing.p2_score()),
            ] {
                if !seen.insert(player) {
                    return Err(TournamentError::DuplicatePlayer(player.name().to_string()));
                }
                standings.push(Standing::new(player.clone(), score));
            }
        }

        sort_standings(&mut standings);
        Ok(standings)
    }

    /// Find the pairing a player sits in.
    pub fn find_pairing(&self, player: &Player) -> Option<&Pairing> {
        self.pairings.iter().find(|p| p.contains(player))
    }

    pub fn player_score(&self, player: &Player) -> Result<i32, TournamentError> {
        self.pairings
            .iter()
            .find_map(|p| p.score_of(player))
            .ok_or_else(|| {
                TournamentError::NotFound(format!("player '{}' is not in this round", player.name()))
            })
    }

    /// Exchange two players between their pairings.
    ///
    /// Swapping two players who already face each other leaves the round unchanged.
    pub fn swap(&mut self, first: &Player, second: &Player) -> Result<(), TournamentError> {
        let index1 = self.position_of(first)?;
        let index2 = self.position_of(second)?;

        if index1 == index2 {
            return Ok(());
        }

        self.pairings[index1].replace_player(first, second.clone())?;
        self.pairings[index2].replace_player(second, first.clone())?;
        Ok(())
    }

    fn position_of(&self, player: &Player) -> Result<usize, TournamentError> {
        self.pairings
            .iter()
            .position(|p| p.contains(player))
            .ok_or_else(|| {
                TournamentError::NotFound(format!(
                    "could not swap players, '{}' is not in this round",
                    player.name()
                ))
            })
    }
}
