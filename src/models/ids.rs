//! Deterministic tournament IDs derived from a SHA256 hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Identifier of a stored tournament.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TournamentId(String);

impl TournamentId {
    /// Derive an ID from the tournament name and its creation time.
    /// Only the first 16 hex characters of the digest are kept.
    pub fn generate(name: &str, created_at: &DateTime<Utc>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update(b"|");
        hasher.update(created_at.to_rfc3339().as_bytes());
        let hash = hex::encode(hasher.finalize());
        Self(hash[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TournamentId({})", self.0)
    }
}

impl From<&str> for TournamentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TournamentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_id_generation_deterministic() {
        let id1 = TournamentId::generate("Spring Open", &fixed_time());
        let id2 = TournamentId::generate("Spring Open", &fixed_time());
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_id_depends_on_name_and_time() {
        let base = TournamentId::generate("Spring Open", &fixed_time());
        let renamed = TournamentId::generate("Autumn Open", &fixed_time());
        let later = TournamentId::generate("Spring Open", &(fixed_time() + chrono::Duration::seconds(1)));

        assert_ne!(base, renamed);
        assert_ne!(base, later);
    }

    #[test]
    fn test_id_is_16_hex_chars() {
        let id = TournamentId::generate("league", &fixed_time());
        assert_eq!(id.as_str().len(), 16);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_id_display_and_debug() {
        let id = TournamentId::from("abc123def456");
        assert_eq!(format!("{}", id), "abc123def456");
        assert_eq!(format!("{:?}", id), "TournamentId(abc123def456)");
    }
}
