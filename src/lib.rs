//! # Tournament Tracker
//!
//! Pairs players round by round and keeps the standings.
//!
//! ## Architecture
//!
//! - **models**: Players, pairings, rounds and tournaments
//! - **generator**: Random and Swiss pairing policies
//! - **storage**: JSON document store for tournaments
//! - **config**: Configuration loading and validation

pub mod config;
pub mod generator;
pub mod models;
pub mod storage;

pub use generator::{PairingGenerator, StandardPairingGenerator, SwissConfig};
pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "5s", "500ms", "2m").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(n) = s.strip_suffix("ms") {
        return n.trim().parse().ok().map(Duration::from_millis);
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.trim().parse().ok()?;
    Some(Duration::from_secs(num.checked_mul(multiplier)?))
}
