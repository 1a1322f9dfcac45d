use std::fmt;

use serde::{Deserialize, Serialize};

/// Knowledge about one (card, holder) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The holder certainly does not have the card.
    No,
    /// Undetermined.
    #[default]
    Maybe,
    /// The holder certainly has the card.
    Yes,
}

impl Status {
    #[inline]
    pub fn is_certain(self) -> bool {
        self != Status::Maybe
    }

    /// Single-character grid rendering.
    pub fn symbol(self) -> char {
        match self {
            Status::No => 'N',
            Status::Maybe => ' ',
            Status::Yes => 'Y',
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::No => f.write_str("NO"),
            Status::Maybe => f.write_str("MAYBE"),
            Status::Yes => f.write_str("YES"),
        }
    }
}
