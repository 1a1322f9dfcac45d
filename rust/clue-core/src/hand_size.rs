//! Hand-size registry: how many cards each holder owns.

use crate::catalog::{Catalog, NUM_CATEGORIES};
use crate::error::ConfigurationError;
use crate::holder::HolderId;

/// Exact card count per holder, indexed by [`HolderId`]. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandSizes {
    sizes: Vec<usize>,
}

impl HandSizes {
    /// Deal `catalog.len() - NUM_CATEGORIES` cards round-robin over `num_players`.
    ///
    /// The `remainder` players starting at `extra_from_seat` (in turn order, wrapping) get one
    /// extra card. The solution holds one card per category.
    pub fn compute(
        num_players: usize,
        catalog: &Catalog,
        extra_from_seat: usize,
    ) -> Result<Self, ConfigurationError> {
        if num_players == 0 {
            return Err(ConfigurationError::NoPlayers);
        }
        if extra_from_seat >= num_players {
            return Err(ConfigurationError::SeatOutOfRange {
                seat: extra_from_seat,
                players: num_players,
            });
        }
        let dealt = catalog.len().saturating_sub(NUM_CATEGORIES);
        if num_players > dealt {
            return Err(ConfigurationError::TooManyPlayers {
                players: num_players,
                dealt,
            });
        }

        let base = dealt / num_players;
        let remainder = dealt % num_players;
        let mut sizes = Vec::with_capacity(num_players + 1);
        for seat in 0..num_players {
            // Distance from the first seat that receives an extra card.
            let offset = (seat + num_players - extra_from_seat) % num_players;
            sizes.push(base + usize::from(offset < remainder));
        }
        sizes.push(NUM_CATEGORIES);
        Ok(Self { sizes })
    }

    /// Rebuild from stored sizes (players in turn order, then the solution).
    pub fn from_sizes(sizes: Vec<usize>, catalog: &Catalog) -> Result<Self, ConfigurationError> {
        let total: usize = sizes.iter().sum();
        let valid = sizes.len() >= 2
            && sizes.last() == Some(&NUM_CATEGORIES)
            && total == catalog.len()
            && sizes[..sizes.len() - 1].iter().all(|&s| s > 0);
        if !valid {
            return Err(ConfigurationError::HandSizeMismatch {
                holders: sizes.len(),
                sizes,
                cards: catalog.len(),
            });
        }
        Ok(Self { sizes })
    }

    pub fn required_count(&self, holder: HolderId) -> usize {
        self.sizes[holder.index()]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.sizes
    }

    pub fn total(&self) -> usize {
        self.sizes.iter().sum()
    }
}
