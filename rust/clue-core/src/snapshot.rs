//! Lossless, name-based export of a game's knowledge.
//!
//! A snapshot carries the three data-model components (cell statuses, pending disjunctions,
//! hand sizes) plus the seating and the local hand, so a persistence layer can store it in any
//! serde format and rebuild an identical [`ClueGame`].

use serde::{Deserialize, Serialize};

use crate::config::VariantConfig;
use crate::engine::{Propagation, Rule};
use crate::error::{ClueError, ConfigurationError, InvalidFactError};
use crate::game::ClueGame;
use crate::grid::KnowledgeGrid;
use crate::hand_size::HandSizes;
use crate::holder::{HolderId, Holders};
use crate::state::{GameSetup, Knowledge};
use crate::status::Status;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSnapshot {
    pub snapshot_version: u32,
    /// Turn order, local player first.
    pub players: Vec<String>,
    pub my_hand: Vec<String>,
    /// Players in turn order, then the solution.
    pub hand_sizes: Vec<usize>,
    /// Catalog order.
    pub rows: Vec<CardRow>,
    pub disjunctions: Vec<DisjunctionRecord>,
}

/// One card's statuses, indexed like `hand_sizes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRow {
    pub card: String,
    pub statuses: Vec<Status>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisjunctionRecord {
    pub holder: String,
    pub cards: Vec<String>,
}

impl ClueGame {
    pub fn snapshot(&self) -> KnowledgeSnapshot {
        let catalog = self.catalog();
        let holders = self.holders();
        let grid = self.knowledge().grid();
        KnowledgeSnapshot {
            snapshot_version: SNAPSHOT_VERSION,
            players: holders.player_names().to_vec(),
            my_hand: self
                .my_hand()
                .iter()
                .map(|&c| catalog.name(c).to_string())
                .collect(),
            hand_sizes: self.hand_sizes().as_slice().to_vec(),
            rows: catalog
                .ids()
                .map(|card| CardRow {
                    card: catalog.name(card).to_string(),
                    statuses: grid.row(card).to_vec(),
                })
                .collect(),
            disjunctions: self
                .pending_disjunctions()
                .map(|d| DisjunctionRecord {
                    holder: holders.name(d.holder).to_string(),
                    cards: d
                        .candidates
                        .iter()
                        .map(|&c| catalog.name(c).to_string())
                        .collect(),
                })
                .collect(),
        }
    }

    /// Rebuild a game from a snapshot taken under the same variant.
    ///
    /// The restored knowledge is re-propagated, so a tampered snapshot that contradicts itself
    /// is rejected rather than loaded.
    pub fn from_snapshot(
        config: &VariantConfig,
        snapshot: &KnowledgeSnapshot,
    ) -> Result<Self, ClueError> {
        if snapshot.snapshot_version != SNAPSHOT_VERSION {
            return Err(ConfigurationError::SnapshotVersion {
                got: snapshot.snapshot_version,
                expected: SNAPSHOT_VERSION,
            }
            .into());
        }
        let catalog = config.catalog()?;
        let holders = Holders::new(&snapshot.players[..])?;
        let hand_sizes = HandSizes::from_sizes(snapshot.hand_sizes.clone(), &catalog)?;
        if hand_sizes.as_slice().len() != holders.len() {
            return Err(ConfigurationError::HandSizeMismatch {
                sizes: snapshot.hand_sizes.clone(),
                cards: catalog.len(),
                holders: holders.len(),
            }
            .into());
        }
        if snapshot.rows.len() != catalog.len() {
            return Err(ConfigurationError::GridShape {
                got: snapshot.rows.len() * holders.len(),
                expected: catalog.len() * holders.len(),
            }
            .into());
        }

        let mut cells = Vec::with_capacity(catalog.len() * holders.len());
        for (card, row) in catalog.ids().zip(&snapshot.rows) {
            if catalog.lookup(&row.card)? != card {
                return Err(InvalidFactError::UnknownCard(row.card.clone()).into());
            }
            if row.statuses.len() != holders.len() {
                return Err(ConfigurationError::GridShape {
                    got: row.statuses.len(),
                    expected: holders.len(),
                }
                .into());
            }
            cells.extend_from_slice(&row.statuses);
        }
        let mut my_hand = snapshot
            .my_hand
            .iter()
            .map(|n| {
                catalog
                    .find(n)
                    .ok_or_else(|| ConfigurationError::UnknownHandCard(n.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        my_hand.sort();
        my_hand.dedup();
        let allowed = hand_sizes.required_count(HolderId::ME);
        if my_hand.len() > allowed {
            return Err(ConfigurationError::HandTooLarge {
                declared: my_hand.len(),
                allowed,
            }
            .into());
        }

        let grid = KnowledgeGrid::from_cells(catalog.len(), holders.len(), &cells)?;
        let setup = GameSetup {
            catalog,
            holders,
            hand_sizes,
        };
        let mut knowledge = Knowledge {
            grid,
            disjunctions: Default::default(),
        };
        {
            let mut propagation = Propagation::new(&setup, &mut knowledge);
            for &card in &my_hand {
                propagation.assert(card, HolderId::ME, Status::Yes, Rule::Restored);
            }
            for record in &snapshot.disjunctions {
                let holder = setup.holders.lookup(&record.holder)?;
                let cards = record
                    .cards
                    .iter()
                    .map(|c| setup.catalog.lookup(c))
                    .collect::<Result<Vec<_>, _>>()?;
                propagation.add_disjunction(holder, &cards)?;
            }
            propagation.sweep()?;
            propagation.run()?;
        }
        Ok(ClueGame::from_state(setup, knowledge, my_hand))
    }
}
