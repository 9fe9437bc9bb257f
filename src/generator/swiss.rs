//! Swiss pairing.
//!
//! Players are ranked by score and paired top-down: the highest unpaired
//! player meets the highest unpaired player they have not met yet. When the
//! remaining players cannot all be paired, the most recent pairing is undone
//! and banned for the rest of the search (chronological backtracking).
//!
//! Rematches are only accepted once some player's appearance count in the
//! working history reaches `field size - 1`. From then on the first candidate
//! is taken whether or not it is a rematch.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use super::validate_field;
use crate::models::{Pairing, Player, Standing, TournamentError};

/// Default wall-clock budget for one Swiss search.
pub const DEFAULT_SWISS_TIMEOUT: Duration = Duration::from_secs(5);

/// Swiss search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwissConfig {
    pub timeout: Duration,
}

impl Default for SwissConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SWISS_TIMEOUT,
        }
    }
}

impl SwissConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// Games already played (or tried and abandoned) during one search.
///
/// Players are referred to by their index in the ranked field.
struct WorkingHistory {
    played: HashSet<(usize, usize)>,
    appearances: Vec<usize>,
}

impl WorkingHistory {
    fn new(field: &[Player], history: &[Pairing]) -> Self {
        let mut working = Self {
            played: HashSet::new(),
            appearances: vec![0; field.len()],
        };

        for pairing in history {
            let first = field.iter().position(|p| p == pairing.player1());
            let second = field.iter().position(|p| p == pairing.player2());

            match (first, second) {
                (Some(a), Some(b)) => working.record(a, b),
                (Some(a), None) | (None, Some(a)) => working.appearances[a] += 1,
                (None, None) => {}
            }
        }

        working
    }

    fn record(&mut self, a: usize, b: usize) {
        self.played.insert(key(a, b));
        self.appearances[a] += 1;
        self.appearances[b] += 1;
    }

    fn has_played(&self, a: usize, b: usize) -> bool {
        self.played.contains(&key(a, b))
    }

    /// False once any player has appeared in `field size - 1` or more games.
    fn unique_pairing_possible(&self) -> bool {
        let limit = self.appearances.len().saturating_sub(1);
        self.appearances.iter().all(|&count| count < limit)
    }
}

fn key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Pair the field in standings order, avoiding rematches from `history`.
///
/// `standings` need not be sorted; players are ranked by descending score with
/// ties kept in input order. The returned pairings are in commit order, which
/// is rank order whenever no backtracking was needed. `history` is not
/// modified.
pub fn swiss(
    standings: &[Standing],
    history: &[Pairing],
    config: &SwissConfig,
) -> Result<Vec<Pairing>, TournamentError> {
    let mut ranked: Vec<&Standing> = standings.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    let field: Vec<Player> = ranked.into_iter().map(|s| s.player.clone()).collect();

    validate_field(&field)?;

    let started = Instant::now();
    let mut working = WorkingHistory::new(&field, history);
    let mut paired = vec![false; field.len()];
    let mut committed: Vec<(usize, usize)> = Vec::with_capacity(field.len() / 2);
    let mut backtracks = 0usize;

    while committed.len() * 2 < field.len() {
        if started.elapsed() > config.timeout {
            warn!(
                "Swiss pairing gave up after {:?} ({} players, {} backtracks)",
                config.timeout,
                field.len(),
                backtracks
            );
            return Err(TournamentError::Timeout(config.timeout));
        }

        let unpaired: Vec<usize> = (0..field.len()).filter(|&i| !paired[i]).collect();

        match next_candidate(&unpaired, &working) {
            Some((a, b)) => {
                if working.has_played(a, b) {
                    debug!(
                        "No unique pairing left, allowing rematch {} vs {}",
                        field[a], field[b]
                    );
                }
                paired[a] = true;
                paired[b] = true;
                committed.push((a, b));
            }
            None => {
                let (a, b) = committed.pop().ok_or_else(|| {
                    TournamentError::InvalidInput(
                        "no complete set of pairings exists for this field".to_string(),
                    )
                })?;
                trace!("Dead end, abandoning {} vs {}", field[a], field[b]);
                paired[a] = false;
                paired[b] = false;
                working.record(a, b);
                backtracks += 1;
            }
        }
    }

    debug!(
        "Created {} Swiss pairings in {:?} ({} backtracks)",
        committed.len(),
        started.elapsed(),
        backtracks
    );

    committed
        .into_iter()
        .map(|(a, b)| Pairing::new(field[a].clone(), field[b].clone()))
        .collect()
}

/// First acceptable pair among `unpaired`, scanning in rank order.
fn next_candidate(unpaired: &[usize], working: &WorkingHistory) -> Option<(usize, usize)> {
    let allow_rematch = !working.unique_pairing_possible();

    for (i, &a) in unpaired.iter().enumerate() {
        for &b in &unpaired[i + 1..] {
            if allow_rematch || !working.has_played(a, b) {
                return Some((a, b));
            }
        }
    }

    None
}
