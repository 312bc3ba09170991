//! Journal entry model.
//!
//! # Invariants
//! - `date` is stamped by the service at every save, overwriting any
//!   previous value. Callers never choose it.

use crate::model::record::{require_text, Collection, Record, RecordId, RecordValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl JournalEntry {
    pub fn new(date: NaiveDate, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            date,
            title: title.into(),
            content: content.into(),
        }
    }
}

impl Record for JournalEntry {
    const COLLECTION: Collection = Collection::JournalEntries;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require_text(Self::COLLECTION, "title", &self.title)
    }
}
