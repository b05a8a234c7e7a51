//! Route handlers.

pub mod analyze;
pub mod health;
pub mod search_player;
