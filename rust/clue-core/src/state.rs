//! Game state: the immutable table setup and the mutable knowledge derived so far.

use crate::catalog::{CardId, Catalog, Category};
use crate::disjunction::DisjunctionStore;
use crate::grid::KnowledgeGrid;
use crate::hand_size::HandSizes;
use crate::holder::{HolderId, Holders};
use crate::status::Status;

/// Everything fixed for the lifetime of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSetup {
    pub catalog: Catalog,
    pub holders: Holders,
    pub hand_sizes: HandSizes,
}

/// Everything the engine has learned. Only the propagation engine mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Knowledge {
    pub(crate) grid: KnowledgeGrid,
    pub(crate) disjunctions: DisjunctionStore,
}

impl Knowledge {
    pub fn new(setup: &GameSetup) -> Self {
        Self {
            grid: KnowledgeGrid::new(setup.catalog.len(), setup.holders.len()),
            disjunctions: DisjunctionStore::new(),
        }
    }

    pub fn grid(&self) -> &KnowledgeGrid {
        &self.grid
    }

    pub fn disjunctions(&self) -> &DisjunctionStore {
        &self.disjunctions
    }

    pub fn status(&self, card: CardId, holder: HolderId) -> Status {
        self.grid.status(card, holder)
    }

    /// The solution's card in `category`, once determined.
    pub fn solution_card(&self, setup: &GameSetup, category: Category) -> Option<CardId> {
        let solution = setup.holders.solution();
        setup
            .catalog
            .cards_in(category)
            .iter()
            .copied()
            .find(|&c| self.grid.status(c, solution) == Status::Yes)
    }
}
