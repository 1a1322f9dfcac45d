//! clue-core: deduction engine for Clue-family board games.
//!
//! Tracks, for every card and every holder (each player plus the solution envelope), whether
//! the holder certainly has it, certainly lacks it, or is undetermined, and propagates the
//! logical consequences of each new fact to a fixpoint.

pub mod catalog;
pub mod config;
pub mod disjunction;
pub mod engine;
pub mod error;
pub mod game;
pub mod grid;
pub mod hand_size;
pub mod holder;
pub mod shared;
pub mod sim;
pub mod snapshot;
pub mod state;
pub mod status;

pub use catalog::{CardId, Catalog, Category, NUM_CATEGORIES};
pub use config::{ConfigError, VariantConfig};
pub use disjunction::{Disjunction, DisjunctionStore};
pub use engine::{Derivation, Propagation, Rule};
pub use error::{ClueError, ConfigurationError, ContradictionError, InvalidFactError};
pub use game::{ClueGame, Event, Fact, IngestReport, Shower, Suggestion};
pub use grid::KnowledgeGrid;
pub use hand_size::HandSizes;
pub use holder::{HolderId, Holders, SOLUTION_NAME};
pub use shared::SharedGame;
pub use snapshot::KnowledgeSnapshot;
pub use state::{GameSetup, Knowledge};
pub use status::Status;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod game_tests;
#[cfg(test)]
mod grid_tests;
#[cfg(test)]
mod snapshot_tests;
