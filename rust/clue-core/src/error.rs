//! Error taxonomy for the deduction engine.
//!
//! - [`ContradictionError`]: the evidence is inconsistent; the offending event is rolled back.
//! - [`InvalidFactError`]: an event references something that does not exist; nothing was applied.
//! - [`ConfigurationError`]: a game could not be constructed.

use thiserror::Error;

use crate::catalog::{CardId, Category};
use crate::engine::Rule;
use crate::holder::HolderId;
use crate::status::Status;

/// Two certain facts disagree, or a rule ran out of possibilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContradictionError {
    #[error("{card} at {holder}: {rule} requires {requested}, but it is already {current}")]
    Conflict {
        card: CardId,
        holder: HolderId,
        current: Status,
        requested: Status,
        rule: Rule,
    },
    #[error("{card} cannot be held by {holder} ({rule}): {owner} already holds it")]
    AlreadyHeld {
        card: CardId,
        holder: HolderId,
        owner: HolderId,
        rule: Rule,
    },
    #[error("{holder} must hold one of {cards:?}, but every candidate is ruled out")]
    DisjunctionExhausted { holder: HolderId, cards: Vec<CardId> },
    #[error("{card} is ruled out for every holder")]
    NoHolder { card: CardId },
    #[error("the solution cannot contain any {category}")]
    EmptyCategory { category: Category },
    #[error("{holder} holds {required} cards but {yes} are known")]
    HandOverflow {
        holder: HolderId,
        yes: usize,
        required: usize,
    },
    #[error("{holder} holds {required} cards but only {possible} remain possible")]
    HandUnderflow {
        holder: HolderId,
        possible: usize,
        required: usize,
    },
}

impl ContradictionError {
    /// Card involved in the contradiction, if it concerns a single cell or row.
    pub fn card(&self) -> Option<CardId> {
        match self {
            ContradictionError::Conflict { card, .. }
            | ContradictionError::AlreadyHeld { card, .. }
            | ContradictionError::NoHolder { card } => Some(*card),
            _ => None,
        }
    }

    /// Holder involved in the contradiction, if any.
    pub fn holder(&self) -> Option<HolderId> {
        match self {
            ContradictionError::Conflict { holder, .. }
            | ContradictionError::AlreadyHeld { holder, .. }
            | ContradictionError::DisjunctionExhausted { holder, .. }
            | ContradictionError::HandOverflow { holder, .. }
            | ContradictionError::HandUnderflow { holder, .. } => Some(*holder),
            ContradictionError::NoHolder { .. } | ContradictionError::EmptyCategory { .. } => None,
        }
    }
}

/// An event that cannot be applied as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidFactError {
    #[error("unknown card: {0:?}")]
    UnknownCard(String),
    #[error("unknown holder: {0:?}")]
    UnknownHolder(String),
    #[error("{0} is not part of this game's catalog")]
    CardOutOfRange(CardId),
    #[error("{0} is not seated in this game")]
    HolderOutOfRange(HolderId),
    #[error("the solution cannot take part in a suggestion")]
    SolutionIsNotAPlayer,
    #[error("a suggestion names {expected} cards, got {got}")]
    SuggestionSize { got: usize, expected: usize },
    #[error("a suggestion names exactly one {0}")]
    SuggestionCategory(Category),
    #[error("the suggester cannot show or pass on their own suggestion")]
    SuggesterResponded,
    #[error("{0} both passed and showed a card")]
    ShowerAlsoPassed(HolderId),
    #[error("{0} is listed as passing more than once")]
    DuplicatePasser(HolderId),
    #[error("shown card {0} was not part of the suggestion")]
    ShownCardNotSuggested(CardId),
    #[error("a shown card requires a shower")]
    ShownWithoutShower,
}

/// A game setup that cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("at least one player is required")]
    NoPlayers,
    #[error("{players} players cannot share {dealt} dealt cards")]
    TooManyPlayers { players: usize, dealt: usize },
    #[error("player names must not be empty")]
    EmptyPlayerName,
    #[error("duplicate player name: {0:?}")]
    DuplicatePlayer(String),
    #[error("{0:?} is reserved for the solution")]
    ReservedPlayerName(String),
    #[error("the {0} category has no cards")]
    EmptyCategory(Category),
    #[error("duplicate card name: {0:?}")]
    DuplicateCard(String),
    #[error("card names must not be empty")]
    EmptyCardName,
    #[error("a catalog of {0} cards is too large")]
    TooManyCards(usize),
    #[error("unknown card in hand: {0:?}")]
    UnknownHandCard(String),
    #[error("declared hand has {declared} cards but the hand size is {allowed}")]
    HandTooLarge { declared: usize, allowed: usize },
    #[error("seat {seat} does not exist with {players} players")]
    SeatOutOfRange { seat: usize, players: usize },
    #[error("hand sizes {sizes:?} do not fit a {cards}-card catalog and {holders} holders")]
    HandSizeMismatch {
        sizes: Vec<usize>,
        cards: usize,
        holders: usize,
    },
    #[error("stored grid has {got} cells, expected {expected}")]
    GridShape { got: usize, expected: usize },
    #[error("snapshot version {got} is not supported (expected {expected})")]
    SnapshotVersion { got: u32, expected: u32 },
}

/// Any failure surfaced by a [`crate::ClueGame`] operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClueError {
    #[error("contradiction: {0}")]
    Contradiction(#[from] ContradictionError),
    #[error("invalid fact: {0}")]
    InvalidFact(#[from] InvalidFactError),
    #[error("configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("game lock poisoned by a panicking thread")]
    LockPoisoned,
}
