pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod index;
pub mod model;
pub mod store;

#[cfg(test)]
mod testutil;

pub use config::Config;
pub use error::{MstgraphError, Result};
pub use graph::{
    collect_ai_chain, expand_decks, quest_stage_enemies, DeckExpansion, ExpansionEngine,
    ExpansionOptions, NpcIdMap,
};
pub use index::{CachedReverseIndex, ReverseIndex, ReverseKind, SqliteReverseIndex};
pub use model::{EntityGraph, EntityKind, Region, ReverseDepth};
pub use store::MasterStore;
