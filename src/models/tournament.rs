//! Tournament model: roster, rounds and cumulative standings.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{sort_standings, Pairing, Player, Round, Standing, TournamentError, TournamentId};
use crate::generator::{PairingGenerator, StandardPairingGenerator};

fn default_generator() -> Arc<dyn PairingGenerator> {
    Arc::new(StandardPairingGenerator::default())
}

/// A tournament with a fixed number of rounds.
///
/// The roster always has an even number of players; an odd roster gets the
/// placeholder player appended. Pairings are produced by the tournament's
/// generator but only stored once the caller assigns them to a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// Unique identifier (derived from name + created_at)
    pub id: TournamentId,

    /// Display name
    pub name: String,

    /// When this tournament was created
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    players: Vec<Player>,

    rounds: Vec<Round>,

    #[serde(skip, default = "default_generator")]
    generator: Arc<dyn PairingGenerator>,
}

impl Tournament {
    /// Create a tournament using the standard pairing generator.
    pub fn new(name: impl Into<String>, rounds: u32) -> Result<Self, TournamentError> {
        Self::with_generator(name, rounds, default_generator())
    }

    /// Create a tournament that delegates pairing to `generator`.
    pub fn with_generator(
        name: impl Into<String>,
        rounds: u32,
        generator: Arc<dyn PairingGenerator>,
    ) -> Result<Self, TournamentError> {
        if rounds == 0 {
            return Err(TournamentError::InvalidInput(
                "tournament should have at least one round".to_string(),
            ));
        }

        let name = name.into();
        let created_at = Utc::now();

        Ok(Self {
            id: TournamentId::generate(&name, &created_at),
            name,
            created_at,
            players: Vec::new(),
            rounds: vec![Round::new(); rounds as usize],
            generator,
        })
    }

    /// Swap in a different pairing generator, e.g. after loading from disk.
    pub fn set_generator(&mut self, generator: Arc<dyn PairingGenerator>) {
        self.generator = generator;
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Replace the roster.
    ///
    /// Pads an odd roster with the placeholder player and clears every round,
    /// discarding all pairings and scores recorded so far. A roster that names
    /// the same player twice (after padding) is rejected and leaves the
    /// tournament untouched.
    pub fn set_players(
        &mut self,
        players: impl IntoIterator<Item = Player>,
    ) -> Result<(), TournamentError> {
        let mut players: Vec<Player> = players.into_iter().collect();
        if players.len() % 2 != 0 {
            players.push(Player::placeholder());
        }

        let mut seen = HashSet::with_capacity(players.len());
        if let Some(dup) = players.iter().find(|p| !seen.insert(*p)) {
            return Err(TournamentError::InvalidInput(format!(
                "player '{}' appears more than once in the roster",
                dup
            )));
        }

        debug!(
            "Tournament {} roster set to {} players, resetting {} rounds",
            self.id,
            players.len(),
            self.rounds.len()
        );

        self.players = players;
        for round in &mut self.rounds {
            round.clear();
        }
        Ok(())
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn round(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index)
    }

    pub fn round_mut(&mut self, index: usize) -> Option<&mut Round> {
        self.rounds.get_mut(index)
    }

    /// Store generated pairings as the given round's pairings.
    pub fn assign_pairings(
        &mut self,
        index: usize,
        pairings: Vec<Pairing>,
    ) -> Result<(), TournamentError> {
        let count = self.rounds.len();
        let round = self.rounds.get_mut(index).ok_or_else(|| {
            TournamentError::NotFound(format!("round {} (tournament has {} rounds)", index + 1, count))
        })?;

        round.set_pairings(pairings);
        Ok(())
    }

    /// Drop the pairings and scores stored for one round.
    ///
    /// The cleared round no longer feeds standings or pairing history, so it
    /// can be paired again from the state before it.
    pub fn clear_round(&mut self, index: usize) -> Result<(), TournamentError> {
        self.assign_pairings(index, Vec::new())
    }

    /// Index of the first round that has no pairings yet.
    pub fn next_unpaired_round(&self) -> Option<usize> {
        self.rounds.iter().position(Round::is_empty)
    }

    /// Every pairing stored in any round, round by round.
    pub fn pairing_history(&self) -> Vec<Pairing> {
        self.rounds
            .iter()
            .flat_map(|r| r.pairings().iter().cloned())
            .collect()
    }

    /// Random pairings for the current roster.
    pub fn randomize_pairings(&self) -> Result<Vec<Pairing>, TournamentError> {
        self.generator.shuffle(&self.players)
    }

    /// Swiss pairings from the current standings and every stored pairing.
    pub fn swiss_pairings(&self) -> Result<Vec<Pairing>, TournamentError> {
        let standings = self.player_standings()?;
        let history = self.pairing_history();
        self.generator.swiss(&standings, &history)
    }

    /// Cumulative standings over all rounds, highest score first.
    ///
    /// Every roster player is listed; players without a game yet score 0.
    /// Ties keep roster order.
    pub fn player_standings(&self) -> Result<Vec<Standing>, TournamentError> {
        let mut standings: Vec<Standing> = self
            .players
            .iter()
            .map(|p| Standing::new(p.clone(), 0))
            .collect();
        let index: HashMap<Player, usize> = self
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();

        for round in &self.rounds {
            for standing in round.standings()? {
                let i = index.get(&standing.player).ok_or_else(|| {
                    TournamentError::NotFound(format!(
                        "player '{}' is not registered in this tournament",
                        standing.player.name()
                    ))
                })?;
                standings[*i].score += standing.score;
            }
        }

        sort_standings(&mut standings);
        Ok(standings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn p(name: &str) -> Player {
        Player::new(name)
    }

    fn roster(names: &[&str]) -> Vec<Player> {
        names.iter().map(|n| p(n)).collect()
    }

    fn tournament(rounds: u32, names: &[&str]) -> Tournament {
        let mut t = Tournament::new("Test Open", rounds).unwrap();
        t.set_players(roster(names)).unwrap();
        t
    }

    /// Generate Swiss pairings, score them and store them in `round`.
    fn play_swiss_round(t: &mut Tournament, round: usize, scores: &[(i32, i32)]) -> Vec<Pairing> {
        let mut pairings = t.swiss_pairings().unwrap();
        for (pairing, (s1, s2)) in pairings.iter_mut().zip(scores) {
            pairing.set_score(*s1, *s2);
        }
        t.assign_pairings(round, pairings.clone()).unwrap();
        pairings
    }

    fn verify_pairing(pairing: &Pairing, first: &Player, second: &Player) {
        assert_eq!(pairing.player1(), first);
        assert_eq!(pairing.player2(), second);
    }

    #[derive(Debug, Default)]
    struct RecordingGenerator {
        shuffles: AtomicUsize,
        swisses: AtomicUsize,
    }

    impl PairingGenerator for RecordingGenerator {
        fn shuffle(&self, players: &[Player]) -> Result<Vec<Pairing>, TournamentError> {
            assert_eq!(players.len() % 2, 0);
            self.shuffles.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        fn swiss(
            &self,
            standings: &[Standing],
            _history: &[Pairing],
        ) -> Result<Vec<Pairing>, TournamentError> {
            assert!(standings.windows(2).all(|w| w[0].score >= w[1].score));
            self.swisses.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let err = Tournament::new("Empty", 0).unwrap_err();
        assert!(matches!(err, TournamentError::InvalidInput(_)));
    }

    #[test]
    fn test_new_tournament_has_empty_rounds() {
        let t = Tournament::new("League", 5).unwrap();

        assert_eq!(t.round_count(), 5);
        assert!(t.rounds().iter().all(Round::is_empty));
        assert_eq!(t.next_unpaired_round(), Some(0));
        assert!(t.players().is_empty());
        assert_eq!(t.id.as_str().len(), 16);
    }

    #[test]
    fn test_odd_roster_gets_placeholder() {
        let t = tournament(1, &["P1", "P2", "P3"]);

        assert_eq!(t.players().len(), 4);
        assert!(t.players().contains(&Player::placeholder()));
    }

    #[test]
    fn test_even_roster_is_unchanged() {
        let t = tournament(1, &["P1", "P2"]);
        assert_eq!(t.players(), roster(&["P1", "P2"]).as_slice());
    }

    #[test]
    fn test_randomize_pairings_calls_generator_shuffle() {
        let generator = Arc::new(RecordingGenerator::default());
        let mut t = Tournament::with_generator("Mocked", 1, generator.clone()).unwrap();
        t.set_players(roster(&["P1", "P2", "P3", "P4"])).unwrap();

        t.randomize_pairings().unwrap();

        assert_eq!(generator.shuffles.load(Ordering::SeqCst), 1);
        assert_eq!(generator.swisses.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_swiss_pairings_calls_generator_swiss() {
        let generator = Arc::new(RecordingGenerator::default());
        let mut t = Tournament::with_generator("Mocked", 1, generator.clone()).unwrap();
        t.set_players(roster(&["P1", "P2", "P3", "P4"])).unwrap();

        t.swiss_pairings().unwrap();

        assert_eq!(generator.swisses.load(Ordering::SeqCst), 1);
        assert_eq!(generator.shuffles.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_modifying_players_resets_rounds() {
        let mut t = tournament(2, &["P1", "P2"]);
        let pairings = t.randomize_pairings().unwrap();
        t.assign_pairings(0, pairings).unwrap();
        t.assign_pairings(1, vec![Pairing::new(p("P2"), p("P1")).unwrap()])
            .unwrap();
        assert!(!t.rounds()[0].is_empty());

        t.set_players(roster(&["P1", "P2", "P3"])).unwrap();

        assert_eq!(t.players().len(), 4);
        assert!(t.rounds().iter().all(Round::is_empty));
        assert!(t.pairing_history().is_empty());
    }

    #[test]
    fn test_assign_pairings_out_of_range() {
        let mut t = tournament(1, &["P1", "P2"]);
        let err = t.assign_pairings(3, Vec::new()).unwrap_err();
        assert!(matches!(err, TournamentError::NotFound(_)));
    }

    #[test]
    fn test_duplicate_roster_rejected() {
        let mut t = tournament(1, &["P1", "P2"]);

        let err = t.set_players(roster(&["P1", "P2", "P1", "P3"])).unwrap_err();
        assert!(matches!(err, TournamentError::InvalidInput(_)));
        assert_eq!(t.players(), roster(&["P1", "P2"]).as_slice());
    }

    #[test]
    fn test_roster_with_placeholder_is_not_padded_twice() {
        let mut t = tournament(1, &["P1", "P2"]);

        let err = t.set_players(roster(&["P1", "", "P2"])).unwrap_err();
        assert!(matches!(err, TournamentError::InvalidInput(_)));

        t.set_players(roster(&["P1", "", "P2", "P3"])).unwrap();
        assert_eq!(t.players().len(), 4);
        assert_eq!(t.player_standings().unwrap().len(), 4);
    }

    #[test]
    fn test_cleared_round_can_be_paired_again() {
        let mut t = tournament(3, &["P1", "P2", "P3", "P4"]);
        let round1 = play_swiss_round(&mut t, 0, &[(15, 5), (2, 18)]);

        // Re-pairing in place sees round 1 as history and its scores as standings.
        let in_place = t.swiss_pairings().unwrap();
        assert_ne!(in_place, t.rounds()[0].pairings());

        let mut scratch = t.clone();
        scratch.clear_round(0).unwrap();
        assert!(scratch.rounds()[0].is_empty());
        assert_eq!(scratch.next_unpaired_round(), Some(0));

        let again = scratch.swiss_pairings().unwrap();
        verify_pairing(&again[0], round1[0].player1(), round1[0].player2());
        verify_pairing(&again[1], round1[1].player1(), round1[1].player2());
        assert_eq!(t.rounds()[0].pairings().len(), 2);
    }

    #[test]
    fn test_clear_round_out_of_range() {
        let mut t = tournament(1, &["P1", "P2"]);
        assert!(matches!(
            t.clear_round(1),
            Err(TournamentError::NotFound(_))
        ));
    }

    #[test]
    fn test_player_standings_from_all_rounds() {
        let mut t = tournament(3, &["P1", "P2", "P3", "P4"]);

        play_swiss_round(&mut t, 0, &[(12, 8), (1, 19)]);
        play_swiss_round(&mut t, 1, &[(13, 7), (10, 10)]);

        let standings = t.player_standings().unwrap();
        let rows: Vec<(&str, i32)> = standings
            .iter()
            .map(|s| (s.player.name(), s.score))
            .collect();

        assert_eq!(rows, vec![("P4", 32), ("P1", 19), ("P2", 18), ("P3", 11)]);
        assert_eq!(t.next_unpaired_round(), Some(2));
    }

    #[test]
    fn test_player_standings_before_any_round() {
        let t = tournament(2, &["P1", "P2", "P3"]);
        let standings = t.player_standings().unwrap();

        assert_eq!(standings.len(), 4);
        assert!(standings.iter().all(|s| s.score == 0));
        assert_eq!(standings[0].player, p("P1"));
    }

    #[test]
    fn test_player_standings_rejects_unknown_player() {
        let mut t = tournament(1, &["P1", "P2"]);
        t.assign_pairings(0, vec![Pairing::new(p("P1"), p("Ghost")).unwrap()])
            .unwrap();

        assert!(matches!(
            t.player_standings(),
            Err(TournamentError::NotFound(_))
        ));
    }

    #[test]
    fn test_swiss_avoids_creating_same_pairing_twice() {
        let mut t = tournament(3, &["P1", "P2", "P3", "P4", "P5", "P6"]);

        let round1 = play_swiss_round(&mut t, 0, &[(11, 9), (0, 20), (10, 10)]);
        verify_pairing(&round1[0], &p("P1"), &p("P2"));
        verify_pairing(&round1[1], &p("P3"), &p("P4"));
        verify_pairing(&round1[2], &p("P5"), &p("P6"));

        let round2 = play_swiss_round(&mut t, 1, &[(1, 19), (0, 20), (0, 20)]);
        verify_pairing(&round2[0], &p("P4"), &p("P1"));
        verify_pairing(&round2[1], &p("P5"), &p("P2"));
        verify_pairing(&round2[2], &p("P6"), &p("P3"));

        let round3 = t.swiss_pairings().unwrap();
        verify_pairing(&round3[0], &p("P1"), &p("P3"));
        verify_pairing(&round3[1], &p("P2"), &p("P6"));
        verify_pairing(&round3[2], &p("P4"), &p("P5"));
    }

    #[test]
    fn test_swiss_repeats_pairing_when_unique_impossible() {
        let mut t = tournament(4, &["P1", "P2", "P3"]);
        let empty = Player::placeholder();

        play_swiss_round(&mut t, 0, &[(20, 0), (20, 0)]);
        play_swiss_round(&mut t, 1, &[(3, 17), (20, 0)]);
        play_swiss_round(&mut t, 2, &[(6, 14), (20, 0)]);

        let round4 = t.swiss_pairings().unwrap();
        verify_pairing(&round4[0], &p("P1"), &p("P3"));
        verify_pairing(&round4[1], &p("P2"), &empty);
    }

    #[test]
    fn test_swiss_pairings_leave_rounds_untouched() {
        let t = tournament(2, &["P1", "P2", "P3", "P4"]);
        let pairings = t.swiss_pairings().unwrap();

        assert_eq!(pairings.len(), 2);
        assert!(t.rounds().iter().all(Round::is_empty));
    }

    #[test]
    fn test_get_opponent_in_generated_pairings() {
        let mut t = tournament(1, &["P1", "P2", "P3"]);
        let pairings = t.swiss_pairings().unwrap();
        t.assign_pairings(0, pairings).unwrap();

        let round = t.round(0).unwrap();
        assert_eq!(round.pairings()[0].opponent(&p("P2")).unwrap(), &p("P1"));
        assert_eq!(
            round.pairings()[1].opponent(&p("P3")).unwrap(),
            &Player::placeholder()
        );
        assert!(matches!(
            round.pairings()[0].opponent(&p("P4")),
            Err(TournamentError::NotFound(_))
        ));
    }

    #[test]
    fn test_swap_in_generated_round() {
        let mut t = tournament(1, &["P1", "P2", "P3", "P4"]);
        let pairings = t.swiss_pairings().unwrap();
        t.assign_pairings(0, pairings).unwrap();

        let round = t.round_mut(0).unwrap();
        round.swap(&p("P1"), &p("P4")).unwrap();
        verify_pairing(&round.pairings()[0], &p("P4"), &p("P2"));
        verify_pairing(&round.pairings()[1], &p("P3"), &p("P1"));

        round.swap(&p("P2"), &p("P1")).unwrap();
        verify_pairing(&round.pairings()[0], &p("P4"), &p("P1"));
        verify_pairing(&round.pairings()[1], &p("P3"), &p("P2"));
    }

    #[test]
    fn test_tournament_serialization_skips_generator() {
        let mut t = tournament(2, &["P1", "P2"]);
        let mut pairings = t.swiss_pairings().unwrap();
        pairings[0].set_score(3, 1);
        t.assign_pairings(0, pairings).unwrap();

        let json = serde_json::to_string(&t).unwrap();
        assert!(!json.contains("generator"));

        let restored: Tournament = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, t.id);
        assert_eq!(restored.players(), t.players());
        assert_eq!(restored.rounds(), t.rounds());
        assert_eq!(restored.randomize_pairings().unwrap().len(), 1);
    }
}
