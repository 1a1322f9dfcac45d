//! Holders: the seated players in turn order plus the solution envelope.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, InvalidFactError};

pub const SOLUTION_NAME: &str = "Solution";

/// Stable holder index. Players occupy `0..num_players` in turn order; the solution comes last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderId(pub u8);

impl HolderId {
    /// The local (human) player always sits first.
    pub const ME: HolderId = HolderId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "holder #{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holders {
    players: Vec<String>,
}

impl Holders {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigurationError> {
        if names.is_empty() {
            return Err(ConfigurationError::NoPlayers);
        }
        // One id is reserved for the solution.
        if names.len() >= u8::MAX as usize {
            return Err(ConfigurationError::TooManyPlayers {
                players: names.len(),
                dealt: u8::MAX as usize - 1,
            });
        }

        let mut seen = HashSet::new();
        let mut players = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(ConfigurationError::EmptyPlayerName);
            }
            if name.eq_ignore_ascii_case(SOLUTION_NAME) {
                return Err(ConfigurationError::ReservedPlayerName(name.to_string()));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(ConfigurationError::DuplicatePlayer(name.to_string()));
            }
            players.push(name.to_string());
        }
        Ok(Self { players })
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Players plus the solution.
    pub fn len(&self) -> usize {
        self.players.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn solution(&self) -> HolderId {
        HolderId(self.players.len() as u8)
    }

    pub fn is_solution(&self, holder: HolderId) -> bool {
        holder == self.solution()
    }

    pub fn is_player(&self, holder: HolderId) -> bool {
        holder.index() < self.players.len()
    }

    pub fn players(&self) -> impl Iterator<Item = HolderId> + '_ {
        (0..self.players.len()).map(|i| HolderId(i as u8))
    }

    pub fn all(&self) -> impl Iterator<Item = HolderId> + '_ {
        (0..self.len()).map(|i| HolderId(i as u8))
    }

    pub fn player_names(&self) -> &[String] {
        &self.players
    }

    pub fn name(&self, holder: HolderId) -> &str {
        if self.is_solution(holder) {
            SOLUTION_NAME
        } else {
            &self.players[holder.index()]
        }
    }

    /// Exact-name lookup, falling back to a case-insensitive match. `"Solution"` resolves to the envelope.
    pub fn find(&self, name: &str) -> Option<HolderId> {
        let name = name.trim();
        if name.eq_ignore_ascii_case(SOLUTION_NAME) {
            return Some(self.solution());
        }
        self.players
            .iter()
            .position(|p| p == name)
            .or_else(|| {
                self.players
                    .iter()
                    .position(|p| p.eq_ignore_ascii_case(name))
            })
            .map(|i| HolderId(i as u8))
    }

    pub fn lookup(&self, name: &str) -> Result<HolderId, InvalidFactError> {
        self.find(name)
            .ok_or_else(|| InvalidFactError::UnknownHolder(name.to_string()))
    }

    pub fn check(&self, holder: HolderId) -> Result<HolderId, InvalidFactError> {
        if holder.index() < self.len() {
            Ok(holder)
        } else {
            Err(InvalidFactError::HolderOutOfRange(holder))
        }
    }

    /// Like [`Holders::check`], but the solution is rejected.
    pub fn check_player(&self, holder: HolderId) -> Result<HolderId, InvalidFactError> {
        self.check(holder)?;
        if self.is_solution(holder) {
            return Err(InvalidFactError::SolutionIsNotAPlayer);
        }
        Ok(holder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solution_sits_after_players() {
        let h = Holders::new(&["Me", "Bob", "Alice"]).unwrap();
        assert_eq!(h.len(), 4);
        assert_eq!(h.solution(), HolderId(3));
        assert_eq!(h.name(HolderId(3)), SOLUTION_NAME);
        assert_eq!(h.find("alice"), Some(HolderId(2)));
        assert_eq!(h.find("solution"), Some(HolderId(3)));
        assert_eq!(
            h.check_player(HolderId(3)).unwrap_err(),
            InvalidFactError::SolutionIsNotAPlayer
        );
        assert_eq!(
            h.check(HolderId(4)).unwrap_err(),
            InvalidFactError::HolderOutOfRange(HolderId(4))
        );
    }

    #[test]
    fn rejects_bad_names() {
        let none: [&str; 0] = [];
        assert_eq!(Holders::new(&none).unwrap_err(), ConfigurationError::NoPlayers);
        assert!(matches!(
            Holders::new(&["Me", "me"]).unwrap_err(),
            ConfigurationError::DuplicatePlayer(_)
        ));
        assert!(matches!(
            Holders::new(&["Me", "Solution"]).unwrap_err(),
            ConfigurationError::ReservedPlayerName(_)
        ));
        assert_eq!(
            Holders::new(&["Me", "  "]).unwrap_err(),
            ConfigurationError::EmptyPlayerName
        );
    }
}
