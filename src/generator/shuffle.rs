//! Random pairing.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::validate_field;
use crate::models::{Pairing, Player, TournamentError};

/// Shuffle the field and pair positions 0-1, 2-3, and so on.
pub fn shuffle<R: Rng + ?Sized>(
    players: &[Player],
    rng: &mut R,
) -> Result<Vec<Pairing>, TournamentError> {
    validate_field(players)?;

    let mut shuffled = players.to_vec();
    shuffled.shuffle(rng);

    let pairings = shuffled
        .chunks_exact(2)
        .map(|pair| Pairing::new(pair[0].clone(), pair[1].clone()))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Shuffled {} players into {} pairings", players.len(), pairings.len());
    Ok(pairings)
}
