//! Seeded simulated tables: a hidden deal plus a referee that answers suggestions truthfully.
//!
//! Used by the property tests and the benchmarks. Everything is driven by a `ChaCha8Rng`
//! seeded from a `u64`, so the same seed always produces the same deal and the same facts.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

use crate::catalog::{CardId, Catalog, Category};
use crate::error::ClueError;
use crate::game::{ClueGame, Fact, Shower, Suggestion};
use crate::hand_size::HandSizes;
use crate::holder::{HolderId, Holders};
use crate::state::GameSetup;
use crate::status::Status;

/// Where every card really is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    /// One card per category, in [`Category::ALL`] order.
    pub solution: Vec<CardId>,
    /// Hands in turn order.
    pub hands: Vec<Vec<CardId>>,
}

impl Deal {
    /// Pick the solution, shuffle the rest and deal hands of the registered sizes.
    pub fn random<R: Rng + ?Sized>(catalog: &Catalog, hand_sizes: &HandSizes, rng: &mut R) -> Self {
        let solution: Vec<CardId> = Category::ALL
            .into_iter()
            .filter_map(|category| catalog.cards_in(category).choose(rng).copied())
            .collect();
        let mut rest: Vec<CardId> = catalog.ids().filter(|c| !solution.contains(c)).collect();
        rest.shuffle(rng);

        let sizes = hand_sizes.as_slice();
        let mut hands = Vec::with_capacity(sizes.len() - 1);
        let mut it = rest.into_iter();
        for &size in &sizes[..sizes.len() - 1] {
            let mut hand: Vec<CardId> = it.by_ref().take(size).collect();
            hand.sort();
            hands.push(hand);
        }
        Self { solution, hands }
    }

    pub fn num_players(&self) -> usize {
        self.hands.len()
    }

    pub fn holder_of(&self, card: CardId) -> HolderId {
        self.hands
            .iter()
            .position(|h| h.contains(&card))
            .map(|p| HolderId(p as u8))
            .unwrap_or(HolderId(self.hands.len() as u8))
    }

    /// The true status of a cell.
    pub fn truth(&self, card: CardId, holder: HolderId) -> Status {
        if self.holder_of(card) == holder {
            Status::Yes
        } else {
            Status::No
        }
    }

    /// Answer a suggestion: players after the suggester respond in turn order until someone
    /// holds one of the cards. Only the local player sees which card is shown.
    pub fn referee<R: Rng + ?Sized>(
        &self,
        suggester: HolderId,
        cards: Vec<CardId>,
        rng: &mut R,
    ) -> Suggestion {
        let n = self.hands.len();
        let mut passers = Vec::new();
        for step in 1..n {
            let seat = (suggester.index() + step) % n;
            let player = HolderId(seat as u8);
            let matching: Vec<CardId> = cards
                .iter()
                .copied()
                .filter(|c| self.hands[seat].contains(c))
                .collect();
            if let Some(&shown) = matching.choose(rng) {
                let shown = (suggester == HolderId::ME).then_some(shown);
                return Suggestion {
                    suggester,
                    cards,
                    passers,
                    shower: Some(Shower { player, shown }),
                };
            }
            passers.push(player);
        }
        Suggestion {
            suggester,
            cards,
            passers,
            shower: None,
        }
    }
}

/// One random card per category.
pub fn random_suggestion<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Vec<CardId> {
    Category::ALL
        .into_iter()
        .filter_map(|category| catalog.cards_in(category).choose(rng).copied())
        .collect()
}

/// A seeded table with the standard deck.
pub struct Table {
    pub setup: GameSetup,
    pub deal: Deal,
    rng: ChaCha8Rng,
}

impl Table {
    pub fn new(num_players: usize, seed: u64) -> Result<Self, ClueError> {
        let catalog = Catalog::standard();
        let names: Vec<String> = (0..num_players)
            .map(|i| if i == 0 { "Me".to_string() } else { format!("P{i}") })
            .collect();
        let holders = Holders::new(&names[..])?;
        let hand_sizes = HandSizes::compute(num_players, &catalog, 0)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let deal = Deal::random(&catalog, &hand_sizes, &mut rng);
        Ok(Self {
            setup: GameSetup {
                catalog,
                holders,
                hand_sizes,
            },
            deal,
            rng,
        })
    }

    /// A fresh game seeded with the local player's true hand.
    pub fn game(&self) -> Result<ClueGame, ClueError> {
        ClueGame::from_parts(self.setup.clone(), &self.deal.hands[0])
    }

    /// `count` truthful suggestion outcomes from random suggesters.
    pub fn random_facts(&mut self, count: usize) -> Vec<Fact> {
        let n = self.deal.num_players();
        (0..count)
            .map(|_| {
                let suggester = HolderId(self.rng.gen_range(0..n) as u8);
                let cards = random_suggestion(&self.setup.catalog, &mut self.rng);
                Fact::Suggestion(self.deal.referee(suggester, cards, &mut self.rng))
            })
            .collect()
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}
