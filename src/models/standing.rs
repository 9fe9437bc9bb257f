//! Standings: players ranked by score.

use serde::{Deserialize, Serialize};

use super::Player;

/// One row of a standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player: Player,
    pub score: i32,
}

impl Standing {
    pub fn new(player: Player, score: i32) -> Self {
        Self { player, score }
    }
}

impl From<(Player, i32)> for Standing {
    fn from((player, score): (Player, i32)) -> Self {
        Self::new(player, score)
    }
}

/// Sort standings by descending score. Equal scores keep their current order.
pub fn sort_standings(standings: &mut [Standing]) {
    standings.sort_by(|a, b| b.score.cmp(&a.score));
}
