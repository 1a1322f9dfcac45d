//! Fact ingestion: game events in, settled knowledge out.
//!
//! Every event is one transaction. It is applied to a copy of the current knowledge and
//! propagated to a fixpoint; only a successful run replaces the live state, so a rejected event
//! leaves the game exactly as it was.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::catalog::{CardId, Catalog, Category, NUM_CATEGORIES};
use crate::config::VariantConfig;
use crate::disjunction::Disjunction;
use crate::engine::{Derivation, Propagation, Rule};
use crate::error::{ClueError, ConfigurationError, ContradictionError, InvalidFactError};
use crate::hand_size::HandSizes;
use crate::holder::{HolderId, Holders};
use crate::state::{GameSetup, Knowledge};
use crate::status::Status;

/// The player who answered a suggestion, and the card if we saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shower {
    pub player: HolderId,
    pub shown: Option<CardId>,
}

/// Outcome of one suggestion: who passed, and who (if anyone) showed a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub suggester: HolderId,
    pub cards: Vec<CardId>,
    pub passers: Vec<HolderId>,
    pub shower: Option<Shower>,
}

/// An id-based event, ready for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    /// `holder` has `card`.
    Reveal { holder: HolderId, card: CardId },
    /// `holder` does not have `card`.
    NoCard { holder: HolderId, card: CardId },
    Suggestion(Suggestion),
    /// Nobody could answer `suggester`'s suggestion.
    AllPassed {
        suggester: HolderId,
        cards: Vec<CardId>,
    },
}

/// A name-based event, as scripted or logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    Reveal {
        holder: String,
        card: String,
    },
    NoCard {
        holder: String,
        card: String,
    },
    Suggestion {
        suggester: String,
        cards: Vec<String>,
        #[serde(default)]
        passers: Vec<String>,
        #[serde(default)]
        shower: Option<String>,
        #[serde(default)]
        shown: Option<String>,
    },
    AllPassed {
        suggester: String,
        cards: Vec<String>,
    },
}

/// What one successful ingestion changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Every cell that changed, in the order it was written.
    pub derivations: Vec<Derivation>,
}

impl IngestReport {
    /// Cells the engine concluded on its own.
    pub fn inferred(&self) -> impl Iterator<Item = &Derivation> {
        self.derivations.iter().filter(|d| d.rule.is_inferred())
    }

    pub fn is_empty(&self) -> bool {
        self.derivations.is_empty()
    }
}

/// One game's deduction state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueGame {
    setup: GameSetup,
    knowledge: Knowledge,
    my_hand: Vec<CardId>,
}

impl ClueGame {
    /// Start a game. `players` are in turn order with the local player first; `my_hand` is the
    /// local player's dealt cards.
    pub fn new<P: AsRef<str>, C: AsRef<str>>(
        config: &VariantConfig,
        players: &[P],
        my_hand: &[C],
    ) -> Result<Self, ClueError> {
        let catalog = config.catalog()?;
        let hand = my_hand
            .iter()
            .map(|name| {
                catalog
                    .find(name.as_ref())
                    .ok_or_else(|| ConfigurationError::UnknownHandCard(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let holders = Holders::new(players)?;
        let hand_sizes =
            HandSizes::compute(holders.num_players(), &catalog, config.extra_cards_from_seat)?;
        Self::from_parts(
            GameSetup {
                catalog,
                holders,
                hand_sizes,
            },
            &hand,
        )
    }

    /// Start a game with the standard 21-card deck.
    pub fn standard<P: AsRef<str>, C: AsRef<str>>(
        players: &[P],
        my_hand: &[C],
    ) -> Result<Self, ClueError> {
        Self::new(&VariantConfig::default(), players, my_hand)
    }

    /// Start a game from an already-built setup.
    pub fn from_parts(setup: GameSetup, my_hand: &[CardId]) -> Result<Self, ClueError> {
        let sizes = setup.hand_sizes.as_slice();
        if sizes.len() != setup.holders.len() || setup.hand_sizes.total() != setup.catalog.len() {
            return Err(ConfigurationError::HandSizeMismatch {
                sizes: sizes.to_vec(),
                cards: setup.catalog.len(),
                holders: setup.holders.len(),
            }
            .into());
        }
        let mut hand = my_hand.to_vec();
        for &card in &hand {
            if !setup.catalog.contains(card) {
                return Err(ConfigurationError::UnknownHandCard(card.to_string()).into());
            }
        }
        hand.sort();
        hand.dedup();
        let allowed = setup.hand_sizes.required_count(HolderId::ME);
        if hand.len() > allowed {
            return Err(ConfigurationError::HandTooLarge {
                declared: hand.len(),
                allowed,
            }
            .into());
        }

        let mut knowledge = Knowledge::new(&setup);
        {
            let mut propagation = Propagation::new(&setup, &mut knowledge);
            for &card in &hand {
                propagation.assert(card, HolderId::ME, Status::Yes, Rule::InitialHand);
                for other in setup.holders.all().filter(|&h| h != HolderId::ME) {
                    propagation.assert(card, other, Status::No, Rule::InitialHand);
                }
            }
            propagation.sweep()?;
            propagation.run()?;
        }
        Ok(Self {
            setup,
            knowledge,
            my_hand: hand,
        })
    }

    pub(crate) fn from_state(setup: GameSetup, knowledge: Knowledge, my_hand: Vec<CardId>) -> Self {
        Self {
            setup,
            knowledge,
            my_hand,
        }
    }

    // --- Ingestion ---

    /// A card was seen in `holder`'s hand.
    pub fn record_reveal(
        &mut self,
        holder: HolderId,
        card: CardId,
    ) -> Result<IngestReport, ClueError> {
        self.record(&Fact::Reveal { holder, card })
    }

    /// `holder` certainly does not have `card`.
    pub fn record_no_card(
        &mut self,
        holder: HolderId,
        card: CardId,
    ) -> Result<IngestReport, ClueError> {
        self.record(&Fact::NoCard { holder, card })
    }

    pub fn record_suggestion(&mut self, suggestion: &Suggestion) -> Result<IngestReport, ClueError> {
        self.validate_suggestion(suggestion)?;
        self.transact(|p| {
            for &passer in &suggestion.passers {
                for &card in &suggestion.cards {
                    p.assert(card, passer, Status::No, Rule::Given);
                }
            }
            match suggestion.shower {
                Some(Shower {
                    player,
                    shown: Some(card),
                }) => p.assert(card, player, Status::Yes, Rule::Given),
                Some(Shower {
                    player,
                    shown: None,
                }) => {
                    p.add_disjunction(player, &suggestion.cards)?;
                }
                None => {}
            }
            Ok(())
        })
    }

    /// Every player other than the suggester passed. The suggester and the solution are
    /// left untouched.
    pub fn record_all_passed(
        &mut self,
        suggester: HolderId,
        cards: &[CardId],
    ) -> Result<IngestReport, ClueError> {
        self.setup.holders.check_player(suggester)?;
        let passers: Vec<HolderId> = self
            .setup
            .holders
            .players()
            .filter(|&h| h != suggester)
            .collect();
        self.record_suggestion(&Suggestion {
            suggester,
            cards: cards.to_vec(),
            passers,
            shower: None,
        })
    }

    pub fn record(&mut self, fact: &Fact) -> Result<IngestReport, ClueError> {
        match fact {
            Fact::Reveal { holder, card } => self.record_cell(*card, *holder, Status::Yes),
            Fact::NoCard { holder, card } => self.record_cell(*card, *holder, Status::No),
            Fact::Suggestion(s) => self.record_suggestion(s),
            Fact::AllPassed { suggester, cards } => self.record_all_passed(*suggester, cards),
        }
    }

    /// Resolve names and ingest.
    pub fn apply(&mut self, event: &Event) -> Result<IngestReport, ClueError> {
        let fact = self.resolve(event)?;
        self.record(&fact)
    }

    /// Translate a name-based event into ids, without applying it.
    pub fn resolve(&self, event: &Event) -> Result<Fact, InvalidFactError> {
        let catalog = &self.setup.catalog;
        let holders = &self.setup.holders;
        let cards = |names: &[String]| -> Result<Vec<CardId>, InvalidFactError> {
            names.iter().map(|n| catalog.lookup(n)).collect()
        };
        Ok(match event {
            Event::Reveal { holder, card } => Fact::Reveal {
                holder: holders.lookup(holder)?,
                card: catalog.lookup(card)?,
            },
            Event::NoCard { holder, card } => Fact::NoCard {
                holder: holders.lookup(holder)?,
                card: catalog.lookup(card)?,
            },
            Event::Suggestion {
                suggester,
                cards: names,
                passers,
                shower,
                shown,
            } => {
                let shower = match (shower, shown) {
                    (None, Some(_)) => return Err(InvalidFactError::ShownWithoutShower),
                    (None, None) => None,
                    (Some(player), shown) => Some(Shower {
                        player: holders.lookup(player)?,
                        shown: shown.as_deref().map(|c| catalog.lookup(c)).transpose()?,
                    }),
                };
                Fact::Suggestion(Suggestion {
                    suggester: holders.lookup(suggester)?,
                    cards: cards(names)?,
                    passers: passers
                        .iter()
                        .map(|p| holders.lookup(p))
                        .collect::<Result<_, _>>()?,
                    shower,
                })
            }
            Event::AllPassed {
                suggester,
                cards: names,
            } => Fact::AllPassed {
                suggester: holders.lookup(suggester)?,
                cards: cards(names)?,
            },
        })
    }

    fn record_cell(
        &mut self,
        card: CardId,
        holder: HolderId,
        status: Status,
    ) -> Result<IngestReport, ClueError> {
        self.setup.catalog.check(card)?;
        self.setup.holders.check(holder)?;
        self.transact(|p| {
            p.assert(card, holder, status, Rule::Given);
            Ok(())
        })
    }

    fn transact<F>(&mut self, f: F) -> Result<IngestReport, ClueError>
    where
        F: FnOnce(&mut Propagation<'_>) -> Result<(), ClueError>,
    {
        let mut next = self.knowledge.clone();
        let derivations = {
            let mut propagation = Propagation::new(&self.setup, &mut next);
            f(&mut propagation)?;
            propagation.run()?
        };
        self.knowledge = next;
        Ok(IngestReport { derivations })
    }

    fn validate_suggestion(&self, s: &Suggestion) -> Result<(), InvalidFactError> {
        let holders = &self.setup.holders;
        holders.check_player(s.suggester)?;
        self.check_suggested_cards(&s.cards)?;

        let mut passed = BTreeSet::new();
        for &passer in &s.passers {
            holders.check_player(passer)?;
            if passer == s.suggester {
                return Err(InvalidFactError::SuggesterResponded);
            }
            if !passed.insert(passer) {
                return Err(InvalidFactError::DuplicatePasser(passer));
            }
        }
        if let Some(shower) = s.shower {
            holders.check_player(shower.player)?;
            if shower.player == s.suggester {
                return Err(InvalidFactError::SuggesterResponded);
            }
            if passed.contains(&shower.player) {
                return Err(InvalidFactError::ShowerAlsoPassed(shower.player));
            }
            if let Some(card) = shower.shown {
                self.setup.catalog.check(card)?;
                if !s.cards.contains(&card) {
                    return Err(InvalidFactError::ShownCardNotSuggested(card));
                }
            }
        }
        Ok(())
    }

    fn check_suggested_cards(&self, cards: &[CardId]) -> Result<(), InvalidFactError> {
        if cards.len() != NUM_CATEGORIES {
            return Err(InvalidFactError::SuggestionSize {
                got: cards.len(),
                expected: NUM_CATEGORIES,
            });
        }
        for &card in cards {
            self.setup.catalog.check(card)?;
        }
        for category in Category::ALL {
            let n = cards
                .iter()
                .filter(|&&c| self.setup.catalog.category(c) == category)
                .count();
            if n != 1 {
                return Err(InvalidFactError::SuggestionCategory(category));
            }
        }
        Ok(())
    }

    // --- Queries ---

    pub fn setup(&self) -> &GameSetup {
        &self.setup
    }

    pub fn catalog(&self) -> &Catalog {
        &self.setup.catalog
    }

    pub fn holders(&self) -> &Holders {
        &self.setup.holders
    }

    pub fn knowledge(&self) -> &Knowledge {
        &self.knowledge
    }

    pub fn my_hand(&self) -> &[CardId] {
        &self.my_hand
    }

    pub fn card(&self, name: &str) -> Result<CardId, InvalidFactError> {
        self.setup.catalog.lookup(name)
    }

    pub fn holder(&self, name: &str) -> Result<HolderId, InvalidFactError> {
        self.setup.holders.lookup(name)
    }

    /// # Panics
    /// If `card` or `holder` is not part of this game. Use [`ClueGame::status_by_name`] for
    /// unchecked input.
    pub fn status(&self, card: CardId, holder: HolderId) -> Status {
        self.knowledge.status(card, holder)
    }

    pub fn status_by_name(&self, card: &str, holder: &str) -> Result<Status, InvalidFactError> {
        Ok(self.status(self.card(card)?, self.holder(holder)?))
    }

    /// Snapshot of one holder's statuses, in catalog order.
    ///
    /// # Panics
    /// If `holder` is not seated in this game.
    pub fn holder_column(&self, holder: HolderId) -> Vec<(CardId, Status)> {
        self.knowledge.grid.holder_column(holder)
    }

    /// # Panics
    /// If `holder` is not seated in this game.
    pub fn known_cards(&self, holder: HolderId) -> &BTreeSet<CardId> {
        self.knowledge.grid.known_cards(holder)
    }

    /// # Panics
    /// If `holder` is not seated in this game.
    pub fn hand_size(&self, holder: HolderId) -> usize {
        self.setup.hand_sizes.required_count(holder)
    }

    pub fn hand_sizes(&self) -> &HandSizes {
        &self.setup.hand_sizes
    }

    pub fn pending_disjunctions(&self) -> impl Iterator<Item = &Disjunction> {
        self.knowledge.disjunctions.pending()
    }

    /// Categories in which `holder` still has undetermined cards.
    pub fn undetermined_categories(&self, holder: HolderId) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|&category| {
                self.setup
                    .catalog
                    .cards_in(category)
                    .iter()
                    .any(|&c| self.status(c, holder) == Status::Maybe)
            })
            .collect()
    }

    /// Holders whose column still contains `Maybe`.
    pub fn incomplete_holders(&self) -> Vec<HolderId> {
        self.setup
            .holders
            .all()
            .filter(|&h| self.knowledge.grid.maybe_count(h) > 0)
            .collect()
    }

    /// The solution's card in `category`, once determined.
    pub fn solution_card(&self, category: Category) -> Option<CardId> {
        self.knowledge.solution_card(&self.setup, category)
    }

    /// One card per category (suspect, weapon, room), once all three are determined.
    pub fn solution(&self) -> Option<Vec<CardId>> {
        Category::ALL
            .into_iter()
            .map(|category| self.solution_card(category))
            .collect()
    }

    pub fn is_solved(&self) -> bool {
        self.solution().is_some()
    }

    // --- Presentation helpers ---

    /// Human-readable explanation of an error, using card and holder names.
    pub fn describe(&self, err: &ClueError) -> String {
        match err {
            ClueError::Contradiction(c) => format!("contradiction: {}", self.describe_contradiction(c)),
            ClueError::InvalidFact(f) => format!("invalid fact: {}", self.describe_invalid(f)),
            other => other.to_string(),
        }
    }

    fn card_name(&self, card: CardId) -> String {
        if self.setup.catalog.contains(card) {
            self.setup.catalog.name(card).to_string()
        } else {
            card.to_string()
        }
    }

    fn holder_name(&self, holder: HolderId) -> String {
        if holder.index() < self.setup.holders.len() {
            self.setup.holders.name(holder).to_string()
        } else {
            holder.to_string()
        }
    }

    fn describe_contradiction(&self, err: &ContradictionError) -> String {
        match err {
            ContradictionError::Conflict {
                card,
                holder,
                current,
                requested,
                rule,
            } => format!(
                "{} / {}: {} requires {}, but it is already {}",
                self.card_name(*card),
                self.holder_name(*holder),
                rule,
                requested,
                current
            ),
            ContradictionError::AlreadyHeld {
                card,
                holder,
                owner,
                rule,
            } => format!(
                "{} cannot be held by {} ({}): {} already holds it",
                self.card_name(*card),
                self.holder_name(*holder),
                rule,
                self.holder_name(*owner)
            ),
            ContradictionError::DisjunctionExhausted { holder, cards } => format!(
                "{} must hold one of [{}], but every candidate is ruled out",
                self.holder_name(*holder),
                cards
                    .iter()
                    .map(|&c| self.card_name(c))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            ContradictionError::NoHolder { card } => {
                format!("{} is ruled out for every holder", self.card_name(*card))
            }
            ContradictionError::HandOverflow {
                holder,
                yes,
                required,
            } => format!(
                "{} holds {} cards but {} are known",
                self.holder_name(*holder),
                required,
                yes
            ),
            ContradictionError::HandUnderflow {
                holder,
                possible,
                required,
            } => format!(
                "{} holds {} cards but only {} remain possible",
                self.holder_name(*holder),
                required,
                possible
            ),
            ContradictionError::EmptyCategory { .. } => err.to_string(),
        }
    }

    fn describe_invalid(&self, err: &InvalidFactError) -> String {
        match err {
            InvalidFactError::ShowerAlsoPassed(h) => {
                format!("{} both passed and showed a card", self.holder_name(*h))
            }
            InvalidFactError::DuplicatePasser(h) => {
                format!("{} is listed as passing more than once", self.holder_name(*h))
            }
            InvalidFactError::ShownCardNotSuggested(c) => format!(
                "shown card {} was not part of the suggestion",
                self.card_name(*c)
            ),
            other => other.to_string(),
        }
    }

    /// Plain-text grid: one row per card, one column per holder.
    pub fn render_grid(&self) -> String {
        let catalog = &self.setup.catalog;
        let holders = &self.setup.holders;
        let card_w = catalog
            .ids()
            .map(|c| catalog.name(c).len())
            .max()
            .unwrap_or(0)
            .max(4);
        let widths: Vec<usize> = holders.all().map(|h| holders.name(h).len().max(3)).collect();

        let mut out = String::new();
        let _ = write!(out, "{:<card_w$}", "Card");
        for (h, w) in holders.all().zip(&widths) {
            let _ = write!(out, " | {:^w$}", holders.name(h), w = *w);
        }
        out.push('\n');
        let line_len = card_w + widths.iter().map(|w| w + 3).sum::<usize>();
        for category in Category::ALL {
            out.push_str(&"-".repeat(line_len));
            out.push('\n');
            for &card in catalog.cards_in(category) {
                let _ = write!(out, "{:<card_w$}", catalog.name(card));
                for (h, w) in holders.all().zip(&widths) {
                    let symbol = self.status(card, h).symbol();
                    let _ = write!(out, " | {:^w$}", symbol, w = *w);
                }
                out.push('\n');
            }
        }
        out
    }
}
