//! Application state cache.
//!
//! # Responsibility
//! - Hold one consistent in-memory snapshot of every collection for
//!   synchronous reads by front-ends.
//! - Rebuild that snapshot wholesale from storage on `reload`.
//! - Apply single-record optimistic updates without a reload.
//!
//! # Invariants
//! - The snapshot equals the store as of the last completed reload, plus any
//!   optimistic updates that persisted successfully since.
//! - `reload` replaces the snapshot only after every collection was read; a
//!   failed reload leaves the previous snapshot untouched.
//! - An optimistic update whose write fails is rolled back in the cache.

use crate::model::record::RecordId;
use crate::model::shopping::ShoppingItem;
use crate::model::snapshot::{Snapshot, SnapshotSlot};
use crate::repo::record_repo::{ReadError, RecordRepository, WriteResult};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Reload failed; the cache still holds the previous snapshot.
#[derive(Debug)]
pub struct ReloadError(pub ReadError);

impl Display for ReloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "state reload failed: {}", self.0)
    }
}

impl Error for ReloadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl From<ReadError> for ReloadError {
    fn from(value: ReadError) -> Self {
        Self(value)
    }
}

/// Owned cache handed by reference to whatever renders from it.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    snapshot: Snapshot,
    reloads: u64,
}

impl AppState {
    /// Creates an empty cache. Call [`AppState::reload`] before rendering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Number of reloads that completed successfully.
    pub fn reload_count(&self) -> u64 {
        self.reloads
    }

    /// Re-reads every collection and swaps the new snapshot in.
    ///
    /// # Errors
    /// - `ReloadError` when any collection read fails. Nothing in the cache
    ///   changes in that case.
    pub fn reload<R: RecordRepository>(&mut self, repo: &R) -> Result<(), ReloadError> {
        let started_at = Instant::now();
        let snapshot = repo.load_snapshot().map_err(|err| {
            error!(
                "event=state_reload module=state status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            ReloadError(err)
        })?;

        self.snapshot = snapshot;
        self.reloads += 1;
        info!(
            "event=state_reload module=state status=ok duration_ms={} tasks={} stores={} items={} members={} journal={}",
            started_at.elapsed().as_millis(),
            self.snapshot.tasks.len(),
            self.snapshot.stores.len(),
            self.snapshot.shopping_lists.len(),
            self.snapshot.family_members.len(),
            self.snapshot.journal_entries.len()
        );
        Ok(())
    }

    /// Edits one cached record in place, then persists it.
    ///
    /// Returns `Ok(false)` when the record is not cached; nothing is written
    /// then. When the write fails the cached record is restored to its
    /// previous value and the error is returned.
    pub fn apply_optimistic<T, R, F>(&mut self, repo: &R, id: RecordId, edit: F) -> WriteResult<bool>
    where
        T: SnapshotSlot,
        R: RecordRepository,
        F: FnOnce(&mut T),
    {
        let Some(record) = self.snapshot.find_mut::<T>(id) else {
            return Ok(false);
        };

        let previous = record.clone();
        edit(record);
        let updated = record.clone();

        if let Err(err) = repo.put(&updated) {
            warn!(
                "event=optimistic_update module=state status=rolled_back collection={} id={id} error={err}",
                T::COLLECTION
            );
            if let Some(record) = self.snapshot.find_mut::<T>(id) {
                *record = previous;
            }
            return Err(err);
        }

        Ok(true)
    }

    /// Sets a shopping item's completion flag without a full reload.
    pub fn toggle_shopping_item<R: RecordRepository>(
        &mut self,
        repo: &R,
        id: RecordId,
        completed: bool,
    ) -> WriteResult<bool> {
        self.apply_optimistic::<ShoppingItem, _, _>(repo, id, |item| item.completed = completed)
    }
}
