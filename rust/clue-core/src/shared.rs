//! Thread-safe handle to one game.
//!
//! The lock is held for the whole ingest-plus-propagate transaction, so other threads only ever
//! observe settled knowledge.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ClueError;
use crate::game::{ClueGame, Event, Fact, IngestReport};

#[derive(Debug, Clone)]
pub struct SharedGame {
    inner: Arc<Mutex<ClueGame>>,
}

impl SharedGame {
    pub fn new(game: ClueGame) -> Self {
        Self {
            inner: Arc::new(Mutex::new(game)),
        }
    }

    pub fn apply(&self, event: &Event) -> Result<IngestReport, ClueError> {
        self.lock()?.apply(event)
    }

    pub fn record(&self, fact: &Fact) -> Result<IngestReport, ClueError> {
        self.lock()?.record(fact)
    }

    /// Run a read-only query under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&ClueGame) -> R) -> Result<R, ClueError> {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    /// Copy of the current state.
    pub fn to_game(&self) -> Result<ClueGame, ClueError> {
        self.read(ClueGame::clone)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ClueGame>, ClueError> {
        self.inner.lock().map_err(|_| ClueError::LockPoisoned)
    }
}
