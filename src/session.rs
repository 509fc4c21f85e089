//! # Session
//! The single live analysis and its lifecycle:
//!
//! ```text
//! Empty --begin--> Processing --complete--> Ready
//!   ^                   |                     |
//!   +------ reset ------+------ reset --------+
//! ```
//!
//! Keyword selection is a sub-state of `Ready` and does not move the phase.
//! A run is identified by a [`RunTicket`]; completing a stale ticket (after a
//! reset or a newer `begin`) is ignored, so readers only ever see a whole
//! batch or none.

use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::batch::AnalysisBatch;
use crate::ingest::DataSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Empty,
    Processing,
    Ready,
}

#[derive(Debug, Clone)]
enum Phase {
    Empty,
    Processing { run: u64, source: DataSource },
    Ready(Arc<AnalysisBatch>),
}

/// Proof that a caller started the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The operation needs a finished batch.
    NotReady(PhaseKind),
    EmptyKeyword,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NotReady(p) => write!(f, "no analysis is ready (state: {:?})", p),
            SessionError::EmptyKeyword => write!(f, "keyword must not be empty"),
        }
    }
}

impl std::error::Error for SessionError {}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    selected: Option<String>,
    last_run: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Empty,
            selected: None,
            last_run: 0,
        }
    }

    pub fn phase(&self) -> PhaseKind {
        match self.phase {
            Phase::Empty => PhaseKind::Empty,
            Phase::Processing { .. } => PhaseKind::Processing,
            Phase::Ready(_) => PhaseKind::Ready,
        }
    }

    /// Start a run. A ready batch is dropped first (new analysis), an
    /// in-flight run is superseded.
    pub fn begin(&mut self, source: DataSource) -> RunTicket {
        self.last_run += 1;
        self.selected = None;
        self.phase = Phase::Processing {
            run: self.last_run,
            source,
        };
        RunTicket(self.last_run)
    }

    /// Publish a finished batch. Returns `false` (and drops the batch) if the
    /// ticket no longer names the in-flight run.
    pub fn complete(&mut self, ticket: RunTicket, batch: AnalysisBatch) -> bool {
        match self.phase {
            Phase::Processing { run, .. } if run == ticket.0 => {
                self.phase = Phase::Ready(Arc::new(batch));
                true
            }
            _ => false,
        }
    }

    /// Give up on a run that failed before producing a batch. A no-op if the
    /// ticket is stale.
    pub fn abandon(&mut self, ticket: RunTicket) {
        if matches!(self.phase, Phase::Processing { run, .. } if run == ticket.0) {
            self.phase = Phase::Empty;
        }
    }

    /// Back to `Empty`; also clears the keyword. Used for reset and new-analysis.
    pub fn reset(&mut self) {
        self.phase = Phase::Empty;
        self.selected = None;
    }

    /// Source of the run in flight, if any.
    pub fn processing_source(&self) -> Option<&DataSource> {
        match &self.phase {
            Phase::Processing { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn batch(&self) -> Result<Arc<AnalysisBatch>, SessionError> {
        match &self.phase {
            Phase::Ready(b) => Ok(Arc::clone(b)),
            _ => Err(SessionError::NotReady(self.phase())),
        }
    }

    /// Select a keyword (trimmed, lowercased). Keywords absent from the
    /// table are accepted and simply match nothing.
    pub fn select_keyword(&mut self, word: &str) -> Result<&str, SessionError> {
        self.batch()?;
        let w = word.trim().to_lowercase();
        if w.is_empty() {
            return Err(SessionError::EmptyKeyword);
        }
        Ok(self.selected.insert(w).as_str())
    }

    pub fn clear_keyword(&mut self) {
        self.selected = None;
    }

    pub fn selected_keyword(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

/// Shared handle: one writer at a time, many readers.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().unwrap_or_else(|p| p.into_inner())
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().unwrap_or_else(|p| p.into_inner())
    }
}
