//! View and modal routing.
//!
//! # Responsibility
//! - Name the closed set of screens and dialogs front-ends render.
//! - Parse the external route names and carry their parameters.
//! - Track which view is current and which modal is open.
//!
//! # Invariants
//! - Every route is an enum variant; a route without a handler is a compile
//!   error in any exhaustive `match`, never a silent no-op.
//! - `ListDetail` always carries the store it shows.

use crate::model::record::RecordId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Route names that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    UnknownView(String),
    UnknownModal(String),
    /// `list-detail` requested without a store id.
    MissingStoreId,
}

impl Display for RouteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownView(name) => write!(f, "unknown view `{name}`"),
            Self::UnknownModal(name) => write!(f, "unknown modal `{name}`"),
            Self::MissingStoreId => write!(f, "list-detail view requires a store id"),
        }
    }
}

impl Error for RouteError {}

/// Top-level screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Dashboard,
    Shopping,
    ListDetail {
        store_id: RecordId,
    },
    Calendar,
    Journal,
}

impl View {
    pub fn name(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Shopping => "shopping",
            Self::ListDetail { .. } => "list-detail",
            Self::Calendar => "calendar",
            Self::Journal => "journal",
        }
    }

    /// Resolves an external view name. `store_id` is only read for
    /// `list-detail`.
    pub fn parse(name: &str, store_id: Option<RecordId>) -> Result<Self, RouteError> {
        match name {
            "dashboard" => Ok(Self::Dashboard),
            "shopping" => Ok(Self::Shopping),
            "list-detail" => store_id
                .map(|store_id| Self::ListDetail { store_id })
                .ok_or(RouteError::MissingStoreId),
            "calendar" => Ok(Self::Calendar),
            "journal" => Ok(Self::Journal),
            other => Err(RouteError::UnknownView(other.to_string())),
        }
    }

    /// Modal opened by the floating action button, if the view shows one.
    pub fn action_modal(self) -> Option<Modal> {
        match self {
            Self::Dashboard | Self::Calendar => Some(Modal::AddItem { task_id: None }),
            Self::Journal => Some(Modal::JournalEntry {
                task_id: None,
                journal_id: None,
            }),
            Self::Shopping | Self::ListDetail { .. } => None,
        }
    }
}

/// Dialogs layered over the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Settings,
    /// New task when `task_id` is `None`, edit otherwise.
    AddItem {
        task_id: Option<RecordId>,
    },
    /// Journal editor, optionally linked to a task and/or editing an entry.
    JournalEntry {
        task_id: Option<RecordId>,
        journal_id: Option<RecordId>,
    },
}

impl Modal {
    /// External element id of the modal.
    pub fn id(self) -> &'static str {
        match self {
            Self::Settings => "settings-modal",
            Self::AddItem { .. } => "add-item-modal",
            Self::JournalEntry { .. } => "journal-entry-modal",
        }
    }

    pub fn parse(
        id: &str,
        task_id: Option<RecordId>,
        journal_id: Option<RecordId>,
    ) -> Result<Self, RouteError> {
        match id {
            "settings-modal" => Ok(Self::Settings),
            "add-item-modal" => Ok(Self::AddItem { task_id }),
            "journal-entry-modal" => Ok(Self::JournalEntry {
                task_id,
                journal_id,
            }),
            other => Err(RouteError::UnknownModal(other.to_string())),
        }
    }
}

/// Current view plus the modal open above it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    current: View,
    modal: Option<Modal>,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current
    }

    pub fn modal(&self) -> Option<Modal> {
        self.modal
    }

    /// Switches view; an open modal stays open.
    pub fn switch_to(&mut self, view: View) {
        self.current = view;
    }

    pub fn open(&mut self, modal: Modal) {
        self.modal = Some(modal);
    }

    /// Closes `modal` if it is the one open. Closing another is a no-op.
    pub fn close(&mut self, modal_id: &str) {
        if self.modal.map(Modal::id) == Some(modal_id) {
            self.modal = None;
        }
    }

    /// Opens whatever the current view's action button opens.
    pub fn trigger_action(&mut self) -> Option<Modal> {
        let modal = self.current.action_modal()?;
        self.open(modal);
        Some(modal)
    }
}
