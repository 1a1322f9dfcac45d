//! clue-logging: NDJSON session logs and snapshot files for deduction sessions.
//!
//! A session log is append-only: one `session` header, then one line per ingested or rejected
//! event, then an optional `summary`. Snapshots are written atomically as pretty JSON.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use clue_core::{ClueError, ClueGame, Derivation, Event, IngestReport, KnowledgeSnapshot, Rule, Status};
use serde::{Deserialize, Serialize};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log line schema version.
pub const LOG_SCHEMA_VERSION: u32 = 1;

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

pub fn hash_config_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

pub fn read_snapshot(path: impl AsRef<Path>) -> Result<KnowledgeSnapshot, NdjsonError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice::<KnowledgeSnapshot>(&bytes)?)
}

/// Write via a temp file and rename, so a crash never leaves a half-written snapshot.
pub fn write_snapshot_atomic(
    path: impl AsRef<Path>,
    snapshot: &KnowledgeSnapshot,
) -> Result<(), NdjsonError> {
    let path = path.as_ref();
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(snapshot)?;
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// First line of every session log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionHeaderV1 {
    pub event: String,
    pub ts_ms: u64,
    pub v: u32,
    pub engine_version: String,

    pub variant: String,
    pub config_hash: Option<String>,

    pub players: Vec<String>,
    pub my_hand: Vec<String>,
    pub hand_sizes: Vec<usize>,
}

impl SessionHeaderV1 {
    pub fn new(game: &ClueGame, variant: &str, config_hash: Option<String>) -> Self {
        let catalog = game.catalog();
        Self {
            event: "session".to_string(),
            ts_ms: now_ms(),
            v: LOG_SCHEMA_VERSION,
            engine_version: clue_core::VERSION.to_string(),
            variant: variant.to_string(),
            config_hash,
            players: game.holders().player_names().to_vec(),
            my_hand: game
                .my_hand()
                .iter()
                .map(|&c| catalog.name(c).to_string())
                .collect(),
            hand_sizes: game.hand_sizes().as_slice().to_vec(),
        }
    }
}

/// One changed cell, by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationV1 {
    pub card: String,
    pub holder: String,
    pub status: Status,
    pub rule: Rule,
}

impl DerivationV1 {
    pub fn new(game: &ClueGame, d: &Derivation) -> Self {
        Self {
            card: game.catalog().name(d.card).to_string(),
            holder: game.holders().name(d.holder).to_string(),
            status: d.status,
            rule: d.rule,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub seq: u64,

    pub input: Event,
    pub derived: Vec<DerivationV1>,

    pub pending_disjunctions: usize,
    pub solved: bool,
}

impl IngestEventV1 {
    /// `game` is the state after `report` was applied.
    pub fn new(game: &ClueGame, seq: u64, input: &Event, report: &IngestReport) -> Self {
        Self {
            event: "ingest".to_string(),
            ts_ms: now_ms(),
            seq,
            input: input.clone(),
            derived: report
                .derivations
                .iter()
                .map(|d| DerivationV1::new(game, d))
                .collect(),
            pending_disjunctions: game.pending_disjunctions().count(),
            solved: game.is_solved(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub seq: u64,

    pub input: Event,
    /// "contradiction" | "invalid_fact" | "configuration" | "lock_poisoned"
    pub kind: String,
    pub message: String,
}

impl RejectedEventV1 {
    pub fn new(game: &ClueGame, seq: u64, input: &Event, err: &ClueError) -> Self {
        let kind = match err {
            ClueError::Contradiction(_) => "contradiction",
            ClueError::InvalidFact(_) => "invalid_fact",
            ClueError::Configuration(_) => "configuration",
            ClueError::LockPoisoned => "lock_poisoned",
        };
        Self {
            event: "rejected".to_string(),
            ts_ms: now_ms(),
            seq,
            input: input.clone(),
            kind: kind.to_string(),
            message: game.describe(err),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryEventV1 {
    pub event: String,
    pub ts_ms: u64,

    pub applied: u64,
    pub rejected: u64,
    pub pending_disjunctions: usize,
    /// Suspect, weapon, room; absent until all three are known.
    pub solution: Option<Vec<String>>,
}

impl SummaryEventV1 {
    pub fn new(game: &ClueGame, applied: u64, rejected: u64) -> Self {
        Self {
            event: "summary".to_string(),
            ts_ms: now_ms(),
            applied,
            rejected,
            pending_disjunctions: game.pending_disjunctions().count(),
            solution: game.solution().map(|cards| {
                cards
                    .into_iter()
                    .map(|c| game.catalog().name(c).to_string())
                    .collect()
            }),
        }
    }
}

#[derive(Debug)]
pub enum NdjsonError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for NdjsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Json(e) => write!(f, "json: {e}"),
        }
    }
}

impl std::error::Error for NdjsonError {}

impl From<io::Error> for NdjsonError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NdjsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}
