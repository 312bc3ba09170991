//! Family member model.

use crate::model::record::{require_text, Collection, Record, RecordId, RecordValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A household member. `name` is what tasks reference as assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
}

impl FamilyMember {
    pub fn new(name: impl Into<String>, birthday: Option<NaiveDate>) -> Self {
        Self {
            id: None,
            name: name.into(),
            birthday,
        }
    }
}

impl Record for FamilyMember {
    const COLLECTION: Collection = Collection::FamilyMembers;

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
