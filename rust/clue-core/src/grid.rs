//! Knowledge grid: the authoritative card × holder status matrix.
//!
//! Layout is row-major by card (`cells[card * num_holders + holder]`), so a card's row is a
//! contiguous slice. The grid enforces two invariants on every write:
//! - monotonicity: a certain cell (`Yes`/`No`) never changes again;
//! - row exclusivity: at most one holder has `Yes` for a card.
//!
//! Per-holder `Yes` sets and `Maybe` counts are kept in sync with the cells.

use std::collections::BTreeSet;

use crate::catalog::CardId;
use crate::engine::Rule;
use crate::error::ContradictionError;
use crate::holder::HolderId;
use crate::status::Status;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeGrid {
    num_cards: usize,
    num_holders: usize,
    cells: Vec<Status>,
    /// `Yes` cards per holder.
    known: Vec<BTreeSet<CardId>>,
    /// Current `Yes` holder per card.
    owners: Vec<Option<HolderId>>,
    maybe_counts: Vec<usize>,
}

impl KnowledgeGrid {
    /// All cells start as `Maybe`.
    pub fn new(num_cards: usize, num_holders: usize) -> Self {
        Self {
            num_cards,
            num_holders,
            cells: vec![Status::Maybe; num_cards * num_holders],
            known: vec![BTreeSet::new(); num_holders],
            owners: vec![None; num_cards],
            maybe_counts: vec![num_cards; num_holders],
        }
    }

    /// Rebuild from raw row-major cells, re-deriving the caches.
    ///
    /// # Panics
    /// If `cells.len() != num_cards * num_holders`.
    pub fn from_cells(
        num_cards: usize,
        num_holders: usize,
        cells: &[Status],
    ) -> Result<Self, ContradictionError> {
        assert_eq!(cells.len(), num_cards * num_holders, "grid shape mismatch");
        let mut grid = Self::new(num_cards, num_holders);
        for (i, &status) in cells.iter().enumerate() {
            if status == Status::Maybe {
                continue;
            }
            let card = CardId((i / num_holders) as u8);
            let holder = HolderId((i % num_holders) as u8);
            grid.set_status(card, holder, status, Rule::Restored)?;
        }
        Ok(grid)
    }

    pub fn num_cards(&self) -> usize {
        self.num_cards
    }

    pub fn num_holders(&self) -> usize {
        self.num_holders
    }

    #[inline]
    fn idx(&self, card: CardId, holder: HolderId) -> usize {
        assert!(card.index() < self.num_cards);
        assert!(holder.index() < self.num_holders);
        card.index() * self.num_holders + holder.index()
    }

    #[inline]
    pub fn status(&self, card: CardId, holder: HolderId) -> Status {
        self.cells[self.idx(card, holder)]
    }

    /// Set one cell.
    ///
    /// Returns `Ok(true)` if the cell changed and `Ok(false)` if it already had the requested
    /// value. Overwriting a certain value, or giving a card a second `Yes` holder, is a
    /// contradiction attributed to `rule`.
    pub fn set_status(
        &mut self,
        card: CardId,
        holder: HolderId,
        status: Status,
        rule: Rule,
    ) -> Result<bool, ContradictionError> {
        let i = self.idx(card, holder);
        let current = self.cells[i];
        if current == status {
            return Ok(false);
        }
        if current != Status::Maybe || status == Status::Maybe {
            return Err(ContradictionError::Conflict {
                card,
                holder,
                current,
                requested: status,
                rule,
            });
        }
        if status == Status::Yes {
            if let Some(owner) = self.owners[card.index()] {
                return Err(ContradictionError::AlreadyHeld {
                    card,
                    holder,
                    owner,
                    rule,
                });
            }
            self.owners[card.index()] = Some(holder);
            self.known[holder.index()].insert(card);
        }
        self.cells[i] = status;
        self.maybe_counts[holder.index()] -= 1;
        Ok(true)
    }

    /// One card's statuses across all holders, indexed by holder.
    pub fn row(&self, card: CardId) -> &[Status] {
        let start = card.index() * self.num_holders;
        &self.cells[start..start + self.num_holders]
    }

    /// One holder's statuses across all cards, in catalog order.
    pub fn holder_column(&self, holder: HolderId) -> Vec<(CardId, Status)> {
        (0..self.num_cards)
            .map(|c| {
                let card = CardId(c as u8);
                (card, self.status(card, holder))
            })
            .collect()
    }

    /// Cards still `Maybe` for `holder`.
    pub fn maybe_cards(&self, holder: HolderId) -> impl Iterator<Item = CardId> + '_ {
        (0..self.num_cards)
            .map(|c| CardId(c as u8))
            .filter(move |&card| self.status(card, holder) == Status::Maybe)
    }

    pub fn owner(&self, card: CardId) -> Option<HolderId> {
        self.owners[card.index()]
    }

    pub fn known_cards(&self, holder: HolderId) -> &BTreeSet<CardId> {
        &self.known[holder.index()]
    }

    pub fn yes_count(&self, holder: HolderId) -> usize {
        self.known[holder.index()].len()
    }

    pub fn maybe_count(&self, holder: HolderId) -> usize {
        self.maybe_counts[holder.index()]
    }

    /// Raw row-major cells.
    pub fn cells(&self) -> &[Status] {
        &self.cells
    }
}
