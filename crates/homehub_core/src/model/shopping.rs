//! Stores and the shopping-list items that belong to them.
//!
//! # Invariants
//! - Every `ShoppingItem.store_id` points at an existing `Store`; the
//!   service layer checks this before insert, storage does not.
//! - Store names are unique case-insensitively only at creation time.

use crate::model::record::{require_text, Collection, Record, RecordId, RecordValidationError};
use serde::{Deserialize, Serialize};

/// A place to shop; owns one shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
}

impl Store {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Case-insensitive name comparison used for lookup-before-insert.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl Record for Store {
    const COLLECTION: Collection = Collection::Stores;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require_text(Self::COLLECTION, "name", &self.name)
    }
}

/// One line on a store's shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub store_id: RecordId,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

impl ShoppingItem {
    /// Creates an unsaved, not-yet-completed item.
    pub fn new(store_id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id: None,
            store_id,
            name: name.into(),
            completed: false,
        }
    }
}

impl Record for ShoppingItem {
    const COLLECTION: Collection = Collection::ShoppingLists;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require_text(Self::COLLECTION, "name", &self.name)
    }
}
