//! Commit and history fetch use-cases.
//!
//! # Responsibility
//! - Turn the current marker snapshot into history submissions.
//! - Read back prior submissions, degrading to the last known list on failure.
//!
//! # Invariants
//! - Never mutates or rolls back markers, on success or failure.
//! - Commits are not de-duplicated: committing twice appends twice.
//! - Failures are reported as status values, never raised.

use crate::model::history::{HistoryDraft, HistoryEntry};
use crate::model::marker::Marker;
use crate::sync::history_remote::HistoryRemote;
use log::{error, info, warn};
use std::time::Instant;

/// Outcome of one commit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitStatus {
    pub ok: bool,
    /// Rows accepted by the store (0 on failure).
    pub submitted: usize,
}

pub struct HistoryService<H: HistoryRemote> {
    remote: H,
    last_fetched: Vec<HistoryEntry>,
}

impl<H: HistoryRemote> HistoryService<H> {
    pub fn new(remote: H) -> Self {
        Self {
            remote,
            last_fetched: Vec::new(),
        }
    }

    /// Submits `markers` as new history rows.
    pub fn commit(&self, markers: &[Marker]) -> CommitStatus {
        let started_at = Instant::now();
        let drafts = markers.iter().map(HistoryDraft::from).collect::<Vec<_>>();

        match self.remote.submit(&drafts) {
            Ok(submitted) => {
                info!(
                    "event=history_commit module=service status=ok count={submitted} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                CommitStatus {
                    ok: true,
                    submitted,
                }
            }
            Err(err) => {
                error!(
                    "event=history_commit module=service status=error count={} duration_ms={} error={err}",
                    drafts.len(),
                    started_at.elapsed().as_millis()
                );
                CommitStatus {
                    ok: false,
                    submitted: 0,
                }
            }
        }
    }

    /// Fetches prior submissions.
    ///
    /// On failure returns the last successfully fetched list (empty before
    /// the first success).
    pub fn fetch_history(&mut self) -> Vec<HistoryEntry> {
        match self.remote.fetch_all() {
            Ok(entries) => {
                info!(
                    "event=history_fetch module=service status=ok count={}",
                    entries.len()
                );
                self.last_fetched = entries;
            }
            Err(err) => {
                warn!(
                    "event=history_fetch module=service status=stale count={} error={err}",
                    self.last_fetched.len()
                );
            }
        }
        self.last_fetched.clone()
    }

    pub fn remote(&self) -> &H {
        &self.remote
    }
}
