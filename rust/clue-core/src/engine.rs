//! Constraint propagation engine: the single place that mutates [`Knowledge`].
//!
//! Every primitive update is queued; the loop pops one update, writes it to the grid and
//! re-checks the rules that can fire because of that cell, queueing whatever they conclude.
//! It stops when the queue is empty (fixpoint) or a rule reports a contradiction.
//!
//! Rules, per applied update `(card, holder, status)`:
//! 1. mutual exclusivity: `Yes` makes every other holder `No` for the card;
//! 2. solution category: a solution `Yes` makes the rest of its category `No` there, and a
//!    category with a single possible solution card left gets that card;
//! 3. hand size: a full hand rules out its remaining cards, and a hand that needs all of its
//!    remaining possibilities takes them;
//! 4. row exhaustion: a card with a single possible holder left belongs to it;
//! 5. disjunctions: shrink, resolve or force "at least one of" facts.
//!
//! Statuses only move from `Maybe` to `Yes`/`No`, so the fixpoint does not depend on the order
//! in which updates are processed.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{CardId, Category};
use crate::disjunction::Insert;
use crate::error::ContradictionError;
use crate::holder::HolderId;
use crate::state::{GameSetup, Knowledge};
use crate::status::Status;

/// Why a cell received its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Stated by an ingested event.
    Given,
    /// Dealt to the local player.
    InitialHand,
    MutualExclusivity,
    SolutionCategory,
    CategoryCompletion,
    HandSaturation,
    HandExhaustion,
    RowExhaustion,
    Disjunction,
    /// Loaded from a snapshot.
    Restored,
}

impl Rule {
    pub fn name(self) -> &'static str {
        match self {
            Rule::Given => "given",
            Rule::InitialHand => "initial_hand",
            Rule::MutualExclusivity => "mutual_exclusivity",
            Rule::SolutionCategory => "solution_category",
            Rule::CategoryCompletion => "category_completion",
            Rule::HandSaturation => "hand_saturation",
            Rule::HandExhaustion => "hand_exhaustion",
            Rule::RowExhaustion => "row_exhaustion",
            Rule::Disjunction => "disjunction",
            Rule::Restored => "restored",
        }
    }

    /// True for values the engine concluded rather than received.
    pub fn is_inferred(self) -> bool {
        !matches!(self, Rule::Given | Rule::InitialHand | Rule::Restored)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One primitive cell update, queued or applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Derivation {
    pub card: CardId,
    pub holder: HolderId,
    pub status: Status,
    pub rule: Rule,
}

/// A propagation run over one transaction's worth of updates.
pub struct Propagation<'a> {
    setup: &'a GameSetup,
    knowledge: &'a mut Knowledge,
    queue: VecDeque<Derivation>,
    applied: Vec<Derivation>,
}

impl<'a> Propagation<'a> {
    pub fn new(setup: &'a GameSetup, knowledge: &'a mut Knowledge) -> Self {
        Self {
            setup,
            knowledge,
            queue: VecDeque::new(),
            applied: Vec::new(),
        }
    }

    /// Queue a cell update. Nothing is written until [`Propagation::run`].
    pub fn assert(&mut self, card: CardId, holder: HolderId, status: Status, rule: Rule) {
        self.queue.push_back(Derivation {
            card,
            holder,
            status,
            rule,
        });
    }

    /// Record "`holder` has at least one of `cards`" against the current grid.
    pub fn add_disjunction(
        &mut self,
        holder: HolderId,
        cards: &[CardId],
    ) -> Result<Insert, ContradictionError> {
        let knowledge = &mut *self.knowledge;
        let outcome =
            knowledge
                .disjunctions
                .add(holder, cards.iter().copied(), &knowledge.grid)?;
        if let Insert::Forced(card) = outcome {
            self.assert(card, holder, Status::Yes, Rule::Disjunction);
        }
        Ok(outcome)
    }

    /// Evaluate every rule against the whole grid once, queueing what they conclude.
    ///
    /// Used after construction and after restoring a snapshot, where no single update
    /// triggered the checks.
    pub fn sweep(&mut self) -> Result<(), ContradictionError> {
        let setup = self.setup;
        for holder in setup.holders.all() {
            self.hand_size(holder)?;
        }
        for card in setup.catalog.ids() {
            self.row_exhaustion(card)?;
        }
        let solution = setup.holders.solution();
        for category in Category::ALL {
            for &card in setup.catalog.cards_in(category) {
                if self.knowledge.grid.status(card, solution) == Status::Yes {
                    self.solution_category(card, category);
                }
            }
            self.category_completion(category)?;
        }
        Ok(())
    }

    /// Drain the queue to a fixpoint. Returns the updates that changed a cell, in order.
    pub fn run(mut self) -> Result<Vec<Derivation>, ContradictionError> {
        while let Some(update) = self.queue.pop_front() {
            self.step(update)?;
        }
        Ok(self.applied)
    }

    fn step(&mut self, update: Derivation) -> Result<(), ContradictionError> {
        let Derivation {
            card,
            holder,
            status,
            rule,
        } = update;
        if !self.knowledge.grid.set_status(card, holder, status, rule)? {
            return Ok(());
        }
        self.applied.push(update);

        let setup = self.setup;
        let category = setup.catalog.category(card);
        let at_solution = setup.holders.is_solution(holder);
        match status {
            Status::Yes => {
                self.mutual_exclusivity(card, holder);
                if at_solution {
                    self.solution_category(card, category);
                }
            }
            Status::No => {
                if at_solution {
                    self.category_completion(category)?;
                }
            }
            Status::Maybe => {}
        }
        self.hand_size(holder)?;
        self.row_exhaustion(card)?;

        let forced = self
            .knowledge
            .disjunctions
            .notify_cell_changed(card, holder, status)?;
        for card in forced {
            self.assert(card, holder, Status::Yes, Rule::Disjunction);
        }
        Ok(())
    }

    fn mutual_exclusivity(&mut self, card: CardId, holder: HolderId) {
        let setup = self.setup;
        for other in setup.holders.all() {
            if other != holder && self.knowledge.grid.status(card, other) == Status::Maybe {
                self.assert(card, other, Status::No, Rule::MutualExclusivity);
            }
        }
    }

    fn solution_category(&mut self, card: CardId, category: Category) {
        let setup = self.setup;
        let solution = setup.holders.solution();
        for &other in setup.catalog.cards_in(category) {
            if other != card && self.knowledge.grid.status(other, solution) == Status::Maybe {
                self.assert(other, solution, Status::No, Rule::SolutionCategory);
            }
        }
    }

    fn category_completion(&mut self, category: Category) -> Result<(), ContradictionError> {
        let setup = self.setup;
        let solution = setup.holders.solution();
        let cards = setup.catalog.cards_in(category);
        let grid = &self.knowledge.grid;
        if cards
            .iter()
            .any(|&c| grid.status(c, solution) == Status::Yes)
        {
            return Ok(());
        }
        let mut open = cards
            .iter()
            .copied()
            .filter(|&c| grid.status(c, solution) == Status::Maybe);
        match (open.next(), open.next()) {
            (None, _) => Err(ContradictionError::EmptyCategory { category }),
            (Some(only), None) => {
                self.assert(only, solution, Status::Yes, Rule::CategoryCompletion);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn hand_size(&mut self, holder: HolderId) -> Result<(), ContradictionError> {
        let grid = &self.knowledge.grid;
        let required = self.setup.hand_sizes.required_count(holder);
        let yes = grid.yes_count(holder);
        let maybe = grid.maybe_count(holder);
        if yes > required {
            return Err(ContradictionError::HandOverflow {
                holder,
                yes,
                required,
            });
        }
        if yes + maybe < required {
            return Err(ContradictionError::HandUnderflow {
                holder,
                possible: yes + maybe,
                required,
            });
        }
        if maybe == 0 {
            return Ok(());
        }

        let (status, rule) = if yes == required {
            (Status::No, Rule::HandSaturation)
        } else if yes + maybe == required {
            (Status::Yes, Rule::HandExhaustion)
        } else {
            return Ok(());
        };
        let open: Vec<CardId> = grid.maybe_cards(holder).collect();
        for card in open {
            self.assert(card, holder, status, rule);
        }
        Ok(())
    }

    fn row_exhaustion(&mut self, card: CardId) -> Result<(), ContradictionError> {
        let grid = &self.knowledge.grid;
        if grid.owner(card).is_some() {
            return Ok(());
        }
        let mut open = grid
            .row(card)
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Status::Maybe)
            .map(|(i, _)| HolderId(i as u8));
        match (open.next(), open.next()) {
            (None, _) => Err(ContradictionError::NoHolder { card }),
            (Some(only), None) => {
                self.assert(card, only, Status::Yes, Rule::RowExhaustion);
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
