//! Task/event domain model.
//!
//! # Invariants
//! - `date` is always set.
//! - `time == None` marks an all-day (daily) task; `Some` marks a timed event.
//! - `assignee` names a family member by name, not by id. Two members with
//!   the same name are indistinguishable as assignees.

use crate::model::record::{require_text, Collection, Record, RecordId, RecordValidationError};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Closed set of task categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    #[default]
    Appointment,
    Doctor,
    Dentist,
    School,
    Meeting,
    Work,
    Chore,
    Errand,
}

impl TaskType {
    pub const ALL: [TaskType; 8] = [
        Self::Appointment,
        Self::Doctor,
        Self::Dentist,
        Self::School,
        Self::Meeting,
        Self::Work,
        Self::Chore,
        Self::Errand,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Appointment => "Appointment",
            Self::Doctor => "Doctor",
            Self::Dentist => "Dentist",
            Self::School => "School",
            Self::Meeting => "Meeting",
            Self::Work => "Work",
            Self::Chore => "Chore",
            Self::Errand => "Errand",
        }
    }

    /// Parses the stored type name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Icon class shown next to tasks of this type.
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Doctor => "fa-stethoscope",
            Self::Dentist => "fa-tooth",
            Self::School => "fa-school-bus",
            Self::Work => "fa-building",
            Self::Meeting => "fa-users",
            Self::Chore => "fa-broom",
            Self::Appointment => "fa-calendar-check",
            Self::Errand => "fa-person-running",
        }
    }
}

/// One scheduled task or event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Serialized as `type` to match the stored layout.
    #[serde(rename = "type")]
    pub kind: TaskType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub date: NaiveDate,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "optional_clock_time"
    )]
    pub time: Option<NaiveTime>,
    /// Optional back-reference to a journal entry; not enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_entry_id: Option<RecordId>,
}

impl Task {
    /// Creates an unsaved all-day task.
    pub fn new(name: impl Into<String>, kind: TaskType, date: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            assignee: None,
            date,
            time: None,
            journal_entry_id: None,
        }
    }

    /// Returns whether this is a timed event rather than a daily task.
    pub fn is_timed(&self) -> bool {
        self.time.is_some()
    }
}

impl Record for Task {
    const COLLECTION: Collection = Collection::Tasks;

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

/// `HH:MM` clock time, widened to `HH:MM:SS[.f]` when the time carries
/// seconds. An empty string reads back as "no time".
mod optional_clock_time {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";
    const FORMAT_WITH_SECONDS: &str = "%H:%M:%S";
    const FORMAT_WITH_FRACTION: &str = "%H:%M:%S%.f";

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format(format_for(time)).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveTime::parse_from_str(text, FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(text, FORMAT_WITH_SECONDS))
                .or_else(|_| NaiveTime::parse_from_str(text, FORMAT_WITH_FRACTION))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }

    // Why: minute precision is the common case and keeps stored bodies in the
    // short form, but any finer time must survive a round trip unchanged.
    fn format_for(time: &NaiveTime) -> &'static str {
        if time.nanosecond() != 0 {
            FORMAT_WITH_FRACTION
        } else if time.second() != 0 {
            FORMAT_WITH_SECONDS
        } else {
            FORMAT
        }
    }
}
