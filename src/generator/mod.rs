//! Pairing generators.
//!
//! Turn a field of players into the pairings for the next round:
//! - Random pairing: a uniform shuffle split into adjacent pairs
//! - Swiss pairing: adjacent ranks play each other, avoiding rematches
//!
//! All generators implement the `PairingGenerator` trait so a tournament can
//! be driven by a fake in tests.

pub mod shuffle;
pub mod swiss;

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::PairingConfig;
use crate::models::{Pairing, Player, Standing, TournamentError};

pub use swiss::{SwissConfig, DEFAULT_SWISS_TIMEOUT};

/// Core trait for pairing policies.
pub trait PairingGenerator: fmt::Debug + Send + Sync {
    /// Pair the field at random.
    fn shuffle(&self, players: &[Player]) -> Result<Vec<Pairing>, TournamentError>;

    /// Pair the field by standings without repeating games from `history`
    /// unless a rematch can no longer be avoided.
    fn swiss(
        &self,
        standings: &[Standing],
        history: &[Pairing],
    ) -> Result<Vec<Pairing>, TournamentError>;
}

/// The generator used by tournaments unless told otherwise.
#[derive(Debug, Default)]
pub struct StandardPairingGenerator {
    swiss: SwissConfig,
    rng: Option<Mutex<StdRng>>,
}

impl StandardPairingGenerator {
    pub fn new(swiss: SwissConfig) -> Self {
        Self { swiss, rng: None }
    }

    /// Build a generator from the `[pairing]` config section.
    pub fn from_config(config: &PairingConfig) -> Self {
        let generator = Self::new(config.swiss_config());
        match config.shuffle_seed {
            Some(seed) => generator.with_seed(seed),
            None => generator,
        }
    }

    /// Use a seeded RNG so shuffles are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Some(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    pub fn swiss_config(&self) -> &SwissConfig {
        &self.swiss
    }
}

impl PairingGenerator for StandardPairingGenerator {
    fn shuffle(&self, players: &[Player]) -> Result<Vec<Pairing>, TournamentError> {
        match &self.rng {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                shuffle::shuffle(players, &mut *rng)
            }
            None => shuffle::shuffle(players, &mut rand::thread_rng()),
        }
    }

    fn swiss(
        &self,
        standings: &[Standing],
        history: &[Pairing],
    ) -> Result<Vec<Pairing>, TournamentError> {
        swiss::swiss(standings, history, &self.swiss)
    }
}

/// Check that a field can be split into pairs: even size, no player twice.
pub(crate) fn validate_field(players: &[Player]) -> Result<(), TournamentError> {
    if players.len() % 2 != 0 {
        return Err(TournamentError::InvalidInput(format!(
            "can't create pairings from an odd number of players ({})",
            players.len()
        )));
    }

    let mut seen = HashSet::with_capacity(players.len());
    if let Some(duplicate) = players.iter().find(|p| !seen.insert(*p)) {
        return Err(TournamentError::InvalidInput(format!(
            "player '{}' is listed more than once",
            duplicate.name()
        )));
    }

    Ok(())
}
