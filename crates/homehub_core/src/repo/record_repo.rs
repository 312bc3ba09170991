//! Record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide add/put/get/get_all over the five keyed collections.
//! - Offer the same operations keyed by external collection name with JSON
//!   records, for front-ends that do not link the typed model.
//! - Keep SQL and body encoding inside the persistence boundary.
//!
//! # Invariants
//! - Each operation is its own atomic statement scoped to one collection.
//! - The key column is the source of truth for identity; stored bodies never
//!   carry an `id` field.
//! - Write paths call `Record::validate()` before touching storage.
//! - Last writer wins: `put` never checks what it overwrites.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::family::FamilyMember;
use crate::model::journal::JournalEntry;
use crate::model::record::{
    Collection, Record, RecordId, RecordValidationError, UnknownCollection,
};
use crate::model::shopping::{ShoppingItem, Store};
use crate::model::snapshot::Snapshot;
use crate::model::task::Task;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ID_FIELD: &str = "id";

pub type ReadResult<T> = Result<T, ReadError>;
pub type WriteResult<T> = Result<T, WriteError>;

/// Failure while reading records. Absence is not an error.
#[derive(Debug)]
pub enum ReadError {
    UnknownCollection(UnknownCollection),
    Db(DbError),
    /// A stored body no longer matches its record type.
    InvalidData {
        collection: Collection,
        id: RecordId,
        message: String,
    },
}

impl Display for ReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCollection(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData {
                collection,
                id,
                message,
            } => write!(f, "invalid stored record {collection}/{id}: {message}"),
        }
    }
}

impl Error for ReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownCollection(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData { .. } => None,
        }
    }
}

impl From<UnknownCollection> for ReadError {
    fn from(value: UnknownCollection) -> Self {
        Self::UnknownCollection(value)
    }
}

impl From<DbError> for ReadError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ReadError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Aborted add/put. Callers must not reload the cache after this.
#[derive(Debug)]
pub enum WriteError {
    UnknownCollection(UnknownCollection),
    Validation(RecordValidationError),
    /// A dynamic record could not be read as the collection's record type.
    InvalidRecord {
        collection: Collection,
        message: String,
    },
    Db(DbError),
}

impl Display for WriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCollection(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidRecord {
                collection,
                message,
            } => write!(f, "invalid {collection} record: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownCollection(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidRecord { .. } => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<UnknownCollection> for WriteError {
    fn from(value: UnknownCollection) -> Self {
        Self::UnknownCollection(value)
    }
}

impl From<RecordValidationError> for WriteError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<rusqlite::Error> for WriteError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Runs `$body` with `$record` aliased to the record type of `$collection`.
macro_rules! with_record_type {
    ($collection:expr, $record:ident => $body:expr) => {
        match $collection {
            Collection::Tasks => {
                type $record = Task;
                $body
            }
            Collection::Stores => {
                type $record = Store;
                $body
            }
            Collection::ShoppingLists => {
                type $record = ShoppingItem;
                $body
            }
            Collection::FamilyMembers => {
                type $record = FamilyMember;
                $body
            }
            Collection::JournalEntries => {
                type $record = JournalEntry;
                $body
            }
        }
    };
}

/// Repository interface for the five record collections.
pub trait RecordRepository {
    /// Inserts `record` under a fresh id and returns it. Any id already on
    /// `record` is ignored.
    fn add<T: Record>(&self, record: &T) -> WriteResult<RecordId>;

    /// Upserts `record`. With an id it overwrites (or inserts under) that
    /// key; without one it behaves like [`RecordRepository::add`].
    fn put<T: Record>(&self, record: &T) -> WriteResult<RecordId>;

    /// Point lookup; `Ok(None)` when no record has this id.
    fn get<T: Record>(&self, id: RecordId) -> ReadResult<Option<T>>;

    /// Every record of the collection, in key order.
    fn get_all<T: Record>(&self) -> ReadResult<Vec<T>>;

    /// Reads all five collections. Fails as a whole if any read fails.
    fn load_snapshot(&self) -> ReadResult<Snapshot> {
        read_snapshot(self)
    }

    /// [`RecordRepository::add`] keyed by external collection name.
    fn add_value(&self, collection: &str, record: Value) -> WriteResult<RecordId> {
        let collection = collection.parse::<Collection>()?;
        with_record_type!(collection, R => {
            let record: R = decode_value(collection, record)?;
            self.add(&record)
        })
    }

    /// [`RecordRepository::put`] keyed by external collection name. The
    /// record's `id` field, when present, selects the row to overwrite.
    fn put_value(&self, collection: &str, record: Value) -> WriteResult<RecordId> {
        let collection = collection.parse::<Collection>()?;
        with_record_type!(collection, R => {
            let record: R = decode_value(collection, record)?;
            self.put(&record)
        })
    }

    /// [`RecordRepository::get`] keyed by external collection name.
    fn get_value(&self, collection: &str, id: RecordId) -> ReadResult<Option<Value>> {
        let collection = collection.parse::<Collection>()?;
        with_record_type!(collection, R => {
            self.get::<R>(id)?
                .map(|record| encode_value(collection, id, &record))
                .transpose()
        })
    }

    /// [`RecordRepository::get_all`] keyed by external collection name.
    fn get_all_values(&self, collection: &str) -> ReadResult<Vec<Value>> {
        let collection = collection.parse::<Collection>()?;
        with_record_type!(collection, R => {
            self.get_all::<R>()?
                .iter()
                .map(|record| encode_value(collection, record.id().unwrap_or_default(), record))
                .collect()
        })
    }
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Wraps a connection returned by [`crate::db::initialize`].
    ///
    /// # Errors
    /// - `DbError::Uninitialized` when the schema is not at the latest
    ///   version, so collection tables may be missing.
    pub fn try_new(conn: &'conn Connection) -> Result<Self, DbError> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(DbError::Uninitialized {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn add<T: Record>(&self, record: &T) -> WriteResult<RecordId> {
        record.validate()?;
        let body = encode_body(record)?;

        self.conn.execute(
            &format!("INSERT INTO {} (body) VALUES (?1);", T::COLLECTION.table()),
            [body],
        )?;
        let id = self.conn.last_insert_rowid();

        debug!(
            "event=record_write module=repo status=ok op=add collection={} id={id}",
            T::COLLECTION
        );
        Ok(id)
    }

    fn put<T: Record>(&self, record: &T) -> WriteResult<RecordId> {
        let Some(id) = record.id() else {
            return self.add(record);
        };
        record.validate()?;
        let body = encode_body(record)?;

        self.conn.execute(
            &format!(
                "INSERT INTO {} (id, body) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET body = excluded.body;",
                T::COLLECTION.table()
            ),
            params![id, body],
        )?;

        debug!(
            "event=record_write module=repo status=ok op=put collection={} id={id}",
            T::COLLECTION
        );
        Ok(id)
    }

    fn get<T: Record>(&self, id: RecordId) -> ReadResult<Option<T>> {
        let body: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT body FROM {} WHERE id = ?1;", T::COLLECTION.table()),
                [id],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|body| decode_body(id, &body)).transpose()
    }

    fn get_all<T: Record>(&self) -> ReadResult<Vec<T>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, body FROM {} ORDER BY id ASC;",
            T::COLLECTION.table()
        ))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            let id: RecordId = row.get(0)?;
            let body: String = row.get(1)?;
            records.push(decode_body(id, &body)?);
        }

        Ok(records)
    }

    fn load_snapshot(&self) -> ReadResult<Snapshot> {
        // Why: one read transaction keeps the five collections on the same
        // committed state; a write landing between two reads would otherwise
        // produce a snapshot that never existed in storage.
        let tx = self.conn.unchecked_transaction()?;
        let snapshot = read_snapshot(self)?;
        tx.commit()?;
        Ok(snapshot)
    }
}

fn read_snapshot<R: RecordRepository + ?Sized>(repo: &R) -> ReadResult<Snapshot> {
    Ok(Snapshot {
        tasks: repo.get_all()?,
        stores: repo.get_all()?,
        shopping_lists: repo.get_all()?,
        family_members: repo.get_all()?,
        journal_entries: repo.get_all()?,
    })
}

fn encode_body<T: Record>(record: &T) -> WriteResult<String> {
    let invalid = |message: String| WriteError::InvalidRecord {
        collection: T::COLLECTION,
        message,
    };

    let mut fields = match serde_json::to_value(record).map_err(|err| invalid(err.to_string()))? {
        Value::Object(fields) => fields,
        other => return Err(invalid(format!("expected an object, got `{other}`"))),
    };
    fields.remove(ID_FIELD);
    serde_json::to_string(&fields).map_err(|err| invalid(err.to_string()))
}

fn decode_body<T: Record>(id: RecordId, body: &str) -> ReadResult<T> {
    let invalid = |message: String| ReadError::InvalidData {
        collection: T::COLLECTION,
        id,
        message,
    };

    let mut fields: Map<String, Value> =
        serde_json::from_str(body).map_err(|err| invalid(err.to_string()))?;
    fields.insert(ID_FIELD.to_string(), Value::from(id));

    let mut record: T =
        serde_json::from_value(Value::Object(fields)).map_err(|err| invalid(err.to_string()))?;
    record.set_id(id);
    Ok(record)
}

fn decode_value<T: Record>(collection: Collection, record: Value) -> WriteResult<T> {
    serde_json::from_value(record).map_err(|err| WriteError::InvalidRecord {
        collection,
        message: err.to_string(),
    })
}

fn encode_value<T: Record>(collection: Collection, id: RecordId, record: &T) -> ReadResult<Value> {
    serde_json::to_value(record).map_err(|err| ReadError::InvalidData {
        collection,
        id,
        message: err.to_string(),
    })
}
