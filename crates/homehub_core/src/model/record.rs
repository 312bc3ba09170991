//! Record identity and collection registry.
//!
//! # Responsibility
//! - Name the five record collections and map them to storage tables.
//! - Define the `Record` contract every persisted entity implements.
//!
//! # Invariants
//! - Ids are assigned by the store, unique per collection, never reused.
//! - A record without an id has never been persisted.
//! - Collection names are the external (camelCase) names front-ends use.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned integer key, unique within one collection.
pub type RecordId = i64;

/// One independently keyed group of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Tasks,
    Stores,
    ShoppingLists,
    FamilyMembers,
    JournalEntries,
}

impl Collection {
    /// Every collection, in the order snapshots list them.
    pub const ALL: [Collection; 5] = [
        Self::Tasks,
        Self::Stores,
        Self::ShoppingLists,
        Self::FamilyMembers,
        Self::JournalEntries,
    ];

    /// External collection name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Stores => "stores",
            Self::ShoppingLists => "shoppingLists",
            Self::FamilyMembers => "familyMembers",
            Self::JournalEntries => "journalEntries",
        }
    }

    /// Backing SQLite table.
    pub(crate) fn table(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Stores => "stores",
            Self::ShoppingLists => "shopping_lists",
            Self::FamilyMembers => "family_members",
            Self::JournalEntries => "journal_entries",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Collection name that matches none of the five collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCollection(pub String);

impl Display for UnknownCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown collection `{}`", self.0)
    }
}

impl Error for UnknownCollection {}

impl FromStr for Collection {
    type Err = UnknownCollection;

    /// Parses an external collection name. Matching is exact.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|collection| collection.name() == value)
            .ok_or_else(|| UnknownCollection(value.to_string()))
    }
}

/// Field-level rule violated by a record before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// A required text field is empty after trimming.
    BlankField {
        collection: Collection,
        field: &'static str,
    },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { collection, field } => {
                write!(f, "{collection}.{field} must not be blank")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// Contract shared by the five persisted entity types.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Collection this record type lives in.
    const COLLECTION: Collection;

    /// Store-assigned id, `None` until first persisted.
    fn id(&self) -> Option<RecordId>;

    /// Stamps the store-assigned id. Only persistence code calls this.
    fn set_id(&mut self, id: RecordId);

    /// Checks field rules; called on every write path.
    fn validate(&self) -> Result<(), RecordValidationError> {
        Ok(())
    }
}

pub(crate) fn require_text(
    collection: Collection,
    field: &'static str,
    value: &str,
) -> Result<(), RecordValidationError> {
    if value.trim().is_empty() {
        return Err(RecordValidationError::BlankField { collection, field });
    }
    Ok(())
}
