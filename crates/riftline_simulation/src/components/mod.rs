//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: Actor, Player, Facing
//! - stats: Health, Armor, Score + damage absorption

pub mod actor;
pub mod stats;


// Re-exports для удобного импорта
pub use actor::*;
pub use stats::*;
