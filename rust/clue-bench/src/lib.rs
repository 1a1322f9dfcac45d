//! clue-bench: shared fixtures for the criterion benches.

use clue_core::sim::Table;
use clue_core::{ClueError, ClueGame, Fact};

/// A fresh game plus `count` truthful facts for a seeded table.
pub fn scenario(players: usize, seed: u64, count: usize) -> Result<(ClueGame, Vec<Fact>), ClueError> {
    let mut table = Table::new(players, seed)?;
    let game = table.game()?;
    let facts = table.random_facts(count);
    Ok((game, facts))
}

/// Ingest every fact, returning the number of cells written.
pub fn replay(game: &mut ClueGame, facts: &[Fact]) -> Result<usize, ClueError> {
    let mut cells = 0;
    for fact in facts {
        cells += game.record(fact)?.derivations.len();
    }
    Ok(cells)
}
