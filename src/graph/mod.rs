//! Reference-graph resolution over master data.
//!
//! - [`reverse`]: entity resolution with bounded reverse expansion.
//! - [`deck`]: fixpoint expansion of quest enemy rosters through spawn triggers.
//! - [`ai`]: BFS over AI chains.

pub mod ai;
pub mod deck;
pub mod reverse;

pub use ai::collect_ai_chain;
pub use deck::{expand_decks, quest_stage_enemies, stage_rosters, DeckExpansion, NpcIdMap};
pub use reverse::{ExpansionEngine, ExpansionOptions};
