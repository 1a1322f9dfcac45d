//! Card catalog: the fixed partition of cards into three categories.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, InvalidFactError};

/// Standard 6 suspects.
pub const SUSPECTS: [&str; 6] = [
    "Miss Scarlett",
    "Colonel Mustard",
    "Mrs. White",
    "Mr. Green",
    "Mrs. Peacock",
    "Professor Plum",
];

/// Standard 6 weapons.
pub const WEAPONS: [&str; 6] = [
    "Candlestick",
    "Dagger",
    "Lead Pipe",
    "Revolver",
    "Rope",
    "Wrench",
];

/// Standard 9 rooms.
pub const ROOMS: [&str; 9] = [
    "Hall",
    "Lounge",
    "Dining Room",
    "Kitchen",
    "Ballroom",
    "Conservatory",
    "Billiard Room",
    "Library",
    "Study",
];

pub const NUM_CATEGORIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Suspect,
    Weapon,
    Room,
}

impl Category {
    pub const ALL: [Category; NUM_CATEGORIES] =
        [Category::Suspect, Category::Weapon, Category::Room];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Category::Suspect => 0,
            Category::Weapon => 1,
            Category::Room => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Suspect => "suspect",
            Category::Weapon => "weapon",
            Category::Room => "room",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable index of a card in its [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u8);

impl CardId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card #{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub name: String,
    pub category: Category,
}

/// Immutable card list for one game. Cards are numbered suspects first, then weapons, then rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    cards: Vec<Card>,
    by_category: [Vec<CardId>; NUM_CATEGORIES],
}

impl Catalog {
    /// The 21-card standard deck.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(SUSPECTS.len() + WEAPONS.len() + ROOMS.len());
        let mut by_category: [Vec<CardId>; NUM_CATEGORIES] = Default::default();
        for (category, names) in [
            (Category::Suspect, &SUSPECTS[..]),
            (Category::Weapon, &WEAPONS[..]),
            (Category::Room, &ROOMS[..]),
        ] {
            for name in names {
                by_category[category.index()].push(CardId(cards.len() as u8));
                cards.push(Card {
                    name: (*name).to_string(),
                    category,
                });
            }
        }
        Self { cards, by_category }
    }

    /// Build a catalog from per-category card names.
    pub fn new<S: AsRef<str>>(
        suspects: &[S],
        weapons: &[S],
        rooms: &[S],
    ) -> Result<Self, ConfigurationError> {
        let total = suspects.len() + weapons.len() + rooms.len();
        if total > u8::MAX as usize {
            return Err(ConfigurationError::TooManyCards(total));
        }

        let mut seen = HashSet::new();
        let mut cards = Vec::with_capacity(total);
        let mut by_category: [Vec<CardId>; NUM_CATEGORIES] = Default::default();
        for (category, names) in [
            (Category::Suspect, suspects),
            (Category::Weapon, weapons),
            (Category::Room, rooms),
        ] {
            if names.is_empty() {
                return Err(ConfigurationError::EmptyCategory(category));
            }
            for name in names {
                let name = name.as_ref().trim();
                if name.is_empty() {
                    return Err(ConfigurationError::EmptyCardName);
                }
                if !seen.insert(name.to_lowercase()) {
                    return Err(ConfigurationError::DuplicateCard(name.to_string()));
                }
                by_category[category.index()].push(CardId(cards.len() as u8));
                cards.push(Card {
                    name: name.to_string(),
                    category,
                });
            }
        }
        Ok(Self { cards, by_category })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        (0..self.cards.len()).map(|i| CardId(i as u8))
    }

    pub fn contains(&self, card: CardId) -> bool {
        card.index() < self.cards.len()
    }

    pub fn check(&self, card: CardId) -> Result<CardId, InvalidFactError> {
        if self.contains(card) {
            Ok(card)
        } else {
            Err(InvalidFactError::CardOutOfRange(card))
        }
    }

    pub fn card(&self, card: CardId) -> &Card {
        &self.cards[card.index()]
    }

    pub fn name(&self, card: CardId) -> &str {
        &self.cards[card.index()].name
    }

    pub fn category(&self, card: CardId) -> Category {
        self.cards[card.index()].category
    }

    pub fn cards_in(&self, category: Category) -> &[CardId] {
        &self.by_category[category.index()]
    }

    /// Exact-name lookup, falling back to a case-insensitive match.
    pub fn find(&self, name: &str) -> Option<CardId> {
        let name = name.trim();
        self.cards
            .iter()
            .position(|c| c.name == name)
            .or_else(|| {
                self.cards
                    .iter()
                    .position(|c| c.name.eq_ignore_ascii_case(name))
            })
            .map(|i| CardId(i as u8))
    }

    pub fn lookup(&self, name: &str) -> Result<CardId, InvalidFactError> {
        self.find(name)
            .ok_or_else(|| InvalidFactError::UnknownCard(name.to_string()))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
