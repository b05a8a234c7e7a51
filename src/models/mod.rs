//! Core data models for match data and derived statistics.

mod confidence;
mod match_record;
mod player;
mod stats;

pub use confidence::*;
pub use match_record::*;
pub use player::*;
pub use stats::*;
