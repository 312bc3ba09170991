//! Full in-memory copy of every collection.

use crate::model::family::FamilyMember;
use crate::model::journal::JournalEntry;
use crate::model::record::{Record, RecordId};
use crate::model::shopping::{ShoppingItem, Store};
use crate::model::task::Task;
use serde::Serialize;

/// All five collections as of one read. Records carry their ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub stores: Vec<Store>,
    pub shopping_lists: Vec<ShoppingItem>,
    pub family_members: Vec<FamilyMember>,
    pub journal_entries: Vec<JournalEntry>,
}

impl Snapshot {
    /// Every cached record of type `T`.
    pub fn records<T: SnapshotSlot>(&self) -> &[T] {
        T::slot(self)
    }

    /// Cached record of type `T` with this id.
    pub fn find<T: SnapshotSlot>(&self, id: RecordId) -> Option<&T> {
        T::slot(self).iter().find(|record| record.id() == Some(id))
    }

    pub(crate) fn find_mut<T: SnapshotSlot>(&mut self, id: RecordId) -> Option<&mut T> {
        T::slot_mut(self)
            .iter_mut()
            .find(|record| record.id() == Some(id))
    }

    pub fn task(&self, id: RecordId) -> Option<&Task> {
        self.find(id)
    }

    pub fn store(&self, id: RecordId) -> Option<&Store> {
        self.find(id)
    }

    /// First store whose name matches case-insensitively.
    pub fn store_named(&self, name: &str) -> Option<&Store> {
        self.stores.iter().find(|store| store.has_name(name))
    }

    pub fn shopping_item(&self, id: RecordId) -> Option<&ShoppingItem> {
        self.find(id)
    }

    /// Items on one store's list, in key order.
    pub fn items_for_store(&self, store_id: RecordId) -> impl Iterator<Item = &ShoppingItem> {
        self.shopping_lists
            .iter()
            .filter(move |item| item.store_id == store_id)
    }

    pub fn journal_entry(&self, id: RecordId) -> Option<&JournalEntry> {
        self.find(id)
    }

    /// First member with this exact name. Duplicate names resolve to the
    /// lowest id, since assignment is by name only.
    pub fn member_named(&self, name: &str) -> Option<&FamilyMember> {
        self.family_members.iter().find(|member| member.name == name)
    }

    /// Returns whether every collection is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
            && self.stores.is_empty()
            && self.shopping_lists.is_empty()
            && self.family_members.is_empty()
            && self.journal_entries.is_empty()
    }
}

/// Maps a record type to its vector inside [`Snapshot`].
pub trait SnapshotSlot: Record {
    fn slot(snapshot: &Snapshot) -> &[Self];
    fn slot_mut(snapshot: &mut Snapshot) -> &mut Vec<Self>;
}

macro_rules! snapshot_slot {
    ($record:ty, $field:ident) => {
        impl SnapshotSlot for $record {
            fn slot(snapshot: &Snapshot) -> &[Self] {
                &snapshot.$field
            }

            fn slot_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
                &mut snapshot.$field
            }
        }
    };
}

snapshot_slot!(Task, tasks);
snapshot_slot!(Store, stores);
snapshot_slot!(ShoppingItem, shopping_lists);
snapshot_slot!(FamilyMember, family_members);
snapshot_slot!(JournalEntry, journal_entries);
