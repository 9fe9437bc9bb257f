//! Core data models for tournament tracking.

mod error;
mod ids;
mod pairing;
mod player;
mod round;
mod standing;
mod tournament;

pub use error::*;
pub use ids::*;
pub use pairing::*;
pub use player::*;
pub use round::*;
pub use standing::*;
pub use tournament::*;
