//! Disjunction store: "holder has at least one of these cards" facts not yet resolved.
//!
//! Facts are kept minimal: a fact whose candidates are a superset of another fact for the same
//! holder carries no extra information and is dropped. Storage is ordered by
//! (holder, candidates) so `pending()` is independent of insertion order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::CardId;
use crate::error::ContradictionError;
use crate::grid::KnowledgeGrid;
use crate::holder::HolderId;
use crate::status::Status;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Disjunction {
    pub holder: HolderId,
    pub candidates: BTreeSet<CardId>,
}

impl Disjunction {
    pub fn mentions(&self, card: CardId, holder: HolderId) -> bool {
        self.holder == holder && self.candidates.contains(&card)
    }
}

/// Result of [`DisjunctionStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    /// Stored as a pending fact.
    Stored,
    /// A candidate is already `Yes` for the holder; nothing to remember.
    Satisfied,
    /// An existing fact for the holder already implies this one.
    Redundant,
    /// Exactly one candidate survived; the caller must set it to `Yes`.
    Forced(CardId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisjunctionStore {
    facts: BTreeSet<Disjunction>,
}

impl DisjunctionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register "`holder` has at least one of `candidates`", filtered against the grid.
    pub fn add(
        &mut self,
        holder: HolderId,
        candidates: impl IntoIterator<Item = CardId>,
        grid: &KnowledgeGrid,
    ) -> Result<Insert, ContradictionError> {
        let all: BTreeSet<CardId> = candidates.into_iter().collect();
        if all.iter().any(|&c| grid.status(c, holder) == Status::Yes) {
            return Ok(Insert::Satisfied);
        }
        let live: BTreeSet<CardId> = all
            .iter()
            .copied()
            .filter(|&c| grid.status(c, holder) == Status::Maybe)
            .collect();

        match (live.len(), live.iter().next().copied()) {
            (0, _) => Err(ContradictionError::DisjunctionExhausted {
                holder,
                cards: all.into_iter().collect(),
            }),
            (1, Some(only)) => Ok(Insert::Forced(only)),
            _ => {
                let fact = Disjunction {
                    holder,
                    candidates: live,
                };
                if self.is_implied(&fact) {
                    return Ok(Insert::Redundant);
                }
                self.facts
                    .retain(|f| !(f.holder == holder && f.candidates.is_superset(&fact.candidates)));
                self.facts.insert(fact);
                Ok(Insert::Stored)
            }
        }
    }

    /// Re-evaluate the facts touching `(card, holder)` after that cell became `status`.
    ///
    /// Returns the cards that are now forced to `Yes` for `holder`.
    pub fn notify_cell_changed(
        &mut self,
        card: CardId,
        holder: HolderId,
        status: Status,
    ) -> Result<Vec<CardId>, ContradictionError> {
        if !self.facts.iter().any(|f| f.mentions(card, holder)) {
            return Ok(Vec::new());
        }

        let (touched, rest): (Vec<Disjunction>, Vec<Disjunction>) = std::mem::take(&mut self.facts)
            .into_iter()
            .partition(|f| f.mentions(card, holder));
        self.facts = rest.into_iter().collect();

        let mut forced = Vec::new();
        match status {
            // Satisfied: every touched fact is resolved.
            Status::Yes => {}
            Status::Maybe => {
                self.facts.extend(touched);
            }
            Status::No => {
                for mut fact in touched {
                    let before: Vec<CardId> = fact.candidates.iter().copied().collect();
                    fact.candidates.remove(&card);
                    match (fact.candidates.len(), fact.candidates.iter().next().copied()) {
                        (0, _) => {
                            return Err(ContradictionError::DisjunctionExhausted {
                                holder,
                                cards: before,
                            })
                        }
                        (1, Some(only)) => forced.push(only),
                        _ => {
                            if !self.is_implied(&fact) {
                                self.facts.retain(|f| {
                                    !(f.holder == holder
                                        && f.candidates.is_superset(&fact.candidates))
                                });
                                self.facts.insert(fact);
                            }
                        }
                    }
                }
            }
        }
        forced.sort();
        forced.dedup();
        Ok(forced)
    }

    /// Pending facts in (holder, candidates) order.
    pub fn pending(&self) -> impl Iterator<Item = &Disjunction> {
        self.facts.iter()
    }

    pub fn for_holder(&self, holder: HolderId) -> impl Iterator<Item = &Disjunction> {
        self.facts.iter().filter(move |f| f.holder == holder)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    fn is_implied(&self, fact: &Disjunction) -> bool {
        self.facts
            .iter()
            .any(|f| f.holder == fact.holder && f.candidates.is_subset(&fact.candidates))
    }
}
