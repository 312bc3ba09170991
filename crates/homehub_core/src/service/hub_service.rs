//! Household use-case service.
//!
//! # Responsibility
//! - Turn front-end intents (save task, add item, ...) into repository
//!   writes followed by a full cache reload.
//! - Own the application state cache front-ends render from.
//!
//! # Invariants
//! - Every successful mutation is followed by `AppState::reload`.
//! - A failed write returns before any reload, keeping the cache stale but
//!   consistent.
//! - Shopping completion toggles are the only mutation without a reload.

use crate::model::family::FamilyMember;
use crate::model::journal::JournalEntry;
use crate::model::record::RecordId;
use crate::model::shopping::{ShoppingItem, Store};
use crate::model::snapshot::Snapshot;
use crate::model::task::{Task, TaskType};
use crate::repo::record_repo::{ReadError, RecordRepository, WriteError};
use crate::state::app_state::{AppState, ReloadError};
use chrono::{Local, NaiveDate, NaiveTime};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stores created on first run.
pub const DEFAULT_STORES: &[&str] = &["Grocery", "Pharmacy"];

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for household use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Required text input was empty after trimming.
    BlankInput(&'static str),
    /// Shopping item targets a store that does not exist.
    StoreNotFound(RecordId),
    Read(ReadError),
    Write(WriteError),
    /// The write landed but the cache could not be refreshed.
    Reload(ReloadError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankInput(field) => write!(f, "{field} must not be blank"),
            Self::StoreNotFound(id) => write!(f, "store not found: {id}"),
            Self::Read(err) => write!(f, "{err}"),
            Self::Write(err) => write!(f, "{err}"),
            Self::Reload(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Write(err) => Some(err),
            Self::Reload(err) => Some(err),
            Self::BlankInput(_) | Self::StoreNotFound(_) => None,
        }
    }
}

impl From<ReadError> for ServiceError {
    fn from(value: ReadError) -> Self {
        Self::Read(value)
    }
}

impl From<WriteError> for ServiceError {
    fn from(value: WriteError) -> Self {
        Self::Write(value)
    }
}

impl From<ReloadError> for ServiceError {
    fn from(value: ReloadError) -> Self {
        Self::Reload(value)
    }
}

/// Task form input. `id == None` creates a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub id: Option<RecordId>,
    pub name: String,
    pub kind: TaskType,
    pub assignee: Option<String>,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl TaskDraft {
    pub fn new(name: impl Into<String>, kind: TaskType, date: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            assignee: None,
            date,
            time: None,
        }
    }
}

/// Journal form input, optionally linking the saved entry to a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalDraft {
    pub id: Option<RecordId>,
    pub title: String,
    pub content: String,
    pub task_id: Option<RecordId>,
}

/// Use-case facade over a repository plus the state cache it feeds.
pub struct HubService<R: RecordRepository> {
    repo: R,
    state: AppState,
}

impl<R: RecordRepository> HubService<R> {
    /// Wraps a repository with an empty cache. Nothing is read yet.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: AppState::new(),
        }
    }

    /// Seeds default data when requested, then loads the cache once.
    pub fn start(repo: R, seed_on_first_run: bool) -> ServiceResult<Self> {
        let mut service = Self::new(repo);
        if seed_on_first_run {
            service.insert_default_stores()?;
        }
        service.reload()?;
        Ok(service)
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.state.snapshot()
    }

    /// Refreshes the cache from storage.
    pub fn reload(&mut self) -> Result<(), ReloadError> {
        self.state.reload(&self.repo)
    }

    /// Inserts [`DEFAULT_STORES`] when every collection is empty, then
    /// reloads.
    ///
    /// Returns whether anything was inserted. Reads storage directly, so it
    /// is safe to call before the first reload.
    pub fn seed_initial_data(&mut self) -> ServiceResult<bool> {
        let seeded = self.insert_default_stores()?;
        if seeded {
            self.reload()?;
        }
        Ok(seeded)
    }

    fn insert_default_stores(&self) -> ServiceResult<bool> {
        if !self.repo.load_snapshot()?.is_empty() {
            return Ok(false);
        }

        for name in DEFAULT_STORES {
            self.repo.add(&Store::new(*name))?;
        }
        info!(
            "event=seed module=service status=ok stores={}",
            DEFAULT_STORES.len()
        );
        Ok(true)
    }

    /// Creates or overwrites a task from form input.
    ///
    /// Editing keeps the task's existing journal link.
    pub fn save_task(&mut self, draft: TaskDraft) -> ServiceResult<RecordId> {
        let journal_entry_id = match draft.id {
            Some(id) => self
                .repo
                .get::<Task>(id)?
                .and_then(|existing| existing.journal_entry_id),
            None => None,
        };

        let task = Task {
            id: draft.id,
            name: draft.name,
            kind: draft.kind,
            assignee: draft
                .assignee
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            date: draft.date,
            time: draft.time,
            journal_entry_id,
        };
        let id = self.repo.put(&task)?;
        info!("event=task_save module=service status=ok id={id}");

        self.reload()?;
        Ok(id)
    }

    pub fn add_family_member(
        &mut self,
        name: &str,
        birthday: Option<NaiveDate>,
    ) -> ServiceResult<RecordId> {
        let name = non_blank(name, "member name")?;
        let id = self.repo.add(&FamilyMember::new(name, birthday))?;
        info!("event=member_add module=service status=ok id={id}");

        self.reload()?;
        Ok(id)
    }

    /// Returns the id of the store named `name` (case-insensitive), adding
    /// the store first when the cache has none by that name.
    pub fn open_or_create_store(&mut self, name: &str) -> ServiceResult<RecordId> {
        let name = non_blank(name, "store name")?;
        if let Some(id) = self.snapshot().store_named(name).and_then(|store| store.id) {
            return Ok(id);
        }

        let id = self.repo.add(&Store::new(name))?;
        info!("event=store_add module=service status=ok id={id}");

        self.reload()?;
        Ok(id)
    }

    /// Adds a not-yet-completed item to an existing store's list.
    pub fn add_shopping_item(&mut self, store_id: RecordId, name: &str) -> ServiceResult<RecordId> {
        let name = non_blank(name, "item name")?;
        if self.repo.get::<Store>(store_id)?.is_none() {
            return Err(ServiceError::StoreNotFound(store_id));
        }

        let id = self.repo.add(&ShoppingItem::new(store_id, name))?;
        info!("event=item_add module=service status=ok id={id} store_id={store_id}");

        self.reload()?;
        Ok(id)
    }

    /// Saves a journal entry dated today. See [`HubService::save_journal_entry_on`].
    pub fn save_journal_entry(&mut self, draft: JournalDraft) -> ServiceResult<RecordId> {
        self.save_journal_entry_on(draft, Local::now().date_naive())
    }

    /// Saves a journal entry stamped with `today`, overwriting any previous
    /// date. When `draft.task_id` names an existing task, that task is
    /// re-saved pointing at the entry; a missing task is skipped.
    pub fn save_journal_entry_on(
        &mut self,
        draft: JournalDraft,
        today: NaiveDate,
    ) -> ServiceResult<RecordId> {
        let mut entry = JournalEntry::new(today, draft.title, draft.content);
        entry.id = draft.id;
        let journal_id = self.repo.put(&entry)?;
        info!("event=journal_save module=service status=ok id={journal_id}");

        if let Some(task_id) = draft.task_id {
            if let Some(mut task) = self.repo.get::<Task>(task_id)? {
                task.journal_entry_id = Some(journal_id);
                self.repo.put(&task)?;
                info!(
                    "event=task_link module=service status=ok id={task_id} journal_id={journal_id}"
                );
            }
        }

        self.reload()?;
        Ok(journal_id)
    }

    /// Flips a shopping item's completion flag in the cache and persists it,
    /// without reloading. Returns `false` when the item is not cached.
    pub fn toggle_shopping_item(&mut self, id: RecordId, completed: bool) -> ServiceResult<bool> {
        Ok(self.state.toggle_shopping_item(&self.repo, id, completed)?)
    }
}

fn non_blank<'a>(value: &'a str, field: &'static str) -> ServiceResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::BlankInput(field));
    }
    Ok(trimmed)
}
