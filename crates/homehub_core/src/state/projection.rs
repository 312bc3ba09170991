//! Read models computed from a snapshot for each view.
//!
//! Everything here is a pure function of [`Snapshot`]; nothing reads storage.

use crate::model::journal::JournalEntry;
use crate::model::record::RecordId;
use crate::model::shopping::{ShoppingItem, Store};
use crate::model::snapshot::Snapshot;
use crate::model::task::{Task, TaskType};
use chrono::{NaiveDate, NaiveDateTime};

/// Dashboard content for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard<'a> {
    pub day: NaiveDate,
    /// Tasks with a time, earliest first.
    pub timed_tasks: Vec<&'a Task>,
    /// Tasks without a time, in key order.
    pub daily_tasks: Vec<&'a Task>,
    /// Shopping items not yet completed, across every store.
    pub shopping_needed: usize,
}

impl Dashboard<'_> {
    /// Returns whether the daily section has nothing to show.
    pub fn is_daily_empty(&self) -> bool {
        self.daily_tasks.is_empty() && self.shopping_needed == 0
    }
}

pub fn dashboard(snapshot: &Snapshot, day: NaiveDate) -> Dashboard<'_> {
    let (mut timed_tasks, daily_tasks): (Vec<&Task>, Vec<&Task>) = snapshot
        .tasks
        .iter()
        .filter(|task| task.date == day)
        .partition(|task| task.is_timed());
    timed_tasks.sort_by_key(|task| task.time);

    Dashboard {
        day,
        timed_tasks,
        daily_tasks,
        shopping_needed: snapshot
            .shopping_lists
            .iter()
            .filter(|item| !item.completed)
            .count(),
    }
}

/// One row of the shopping overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSummary<'a> {
    pub store: &'a Store,
    pub needed: usize,
    pub total: usize,
}

pub fn shopping_overview(snapshot: &Snapshot) -> Vec<StoreSummary<'_>> {
    snapshot
        .stores
        .iter()
        .map(|store| {
            let items: Vec<&ShoppingItem> = store
                .id
                .map(|id| snapshot.items_for_store(id).collect())
                .unwrap_or_default();
            StoreSummary {
                store,
                needed: items.iter().filter(|item| !item.completed).count(),
                total: items.len(),
            }
        })
        .collect()
}

/// One store's list. `store` is `None` when the id is not cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDetail<'a> {
    pub store: Option<&'a Store>,
    pub items: Vec<&'a ShoppingItem>,
}

pub fn list_detail(snapshot: &Snapshot, store_id: RecordId) -> ListDetail<'_> {
    ListDetail {
        store: snapshot.store(store_id),
        items: snapshot.items_for_store(store_id).collect(),
    }
}

/// A timed task placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub task_id: RecordId,
    pub title: String,
    pub kind: TaskType,
    pub start: NaiveDateTime,
}

/// Calendar events for every timed task; daily tasks are not shown.
pub fn calendar_events(snapshot: &Snapshot) -> Vec<CalendarEvent> {
    snapshot
        .tasks
        .iter()
        .filter_map(|task| {
            Some(CalendarEvent {
                task_id: task.id?,
                title: task.name.clone(),
                kind: task.kind,
                start: task.date.and_time(task.time?),
            })
        })
        .collect()
}

/// Journal entries, newest date first. Same-day entries keep key order.
pub fn journal_timeline(snapshot: &Snapshot) -> Vec<&JournalEntry> {
    let mut entries: Vec<&JournalEntry> = snapshot.journal_entries.iter().collect();
    entries.sort_by(|left, right| right.date.cmp(&left.date));
    entries
}

#[cfg(test)]
mod tests {
    use super::{calendar_events, dashboard, journal_timeline, list_detail, shopping_overview};
    use crate::model::journal::JournalEntry;
    use crate::model::shopping::{ShoppingItem, Store};
    use crate::model::snapshot::Snapshot;
    use crate::model::task::{Task, TaskType};
    use chrono::{NaiveDate, NaiveTime};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn task(id: i64, name: &str, date: NaiveDate, time: Option<(u32, u32)>) -> Task {
        let mut task = Task::new(name, TaskType::Chore, date);
        task.id = Some(id);
        task.time = time.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0));
        task
    }

    fn item(id: i64, store_id: i64, name: &str, completed: bool) -> ShoppingItem {
        let mut item = ShoppingItem::new(store_id, name);
        item.id = Some(id);
        item.completed = completed;
        item
    }

    fn store(id: i64, name: &str) -> Store {
        let mut store = Store::new(name);
        store.id = Some(id);
        store
    }

    fn sample() -> Snapshot {
        Snapshot {
            tasks: vec![
                task(1, "Dinner", day(1), Some((18, 30))),
                task(2, "Dishes", day(1), None),
                task(3, "School run", day(1), Some((8, 0))),
                task(4, "Tomorrow", day(2), Some((9, 0))),
            ],
            stores: vec![store(1, "Market"), store(2, "Pharmacy")],
            shopping_lists: vec![
                item(1, 1, "Milk", false),
                item(2, 1, "Eggs", true),
                item(3, 1, "Bread", false),
            ],
            ..Snapshot::default()
        }
    }

    #[test]
    fn dashboard_splits_and_sorts_tasks_for_the_day() {
        let snapshot = sample();
        let board = dashboard(&snapshot, day(1));

        let timed: Vec<_> = board.timed_tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(timed, ["School run", "Dinner"]);
        assert_eq!(board.daily_tasks.len(), 1);
        assert_eq!(board.daily_tasks[0].name, "Dishes");
        assert_eq!(board.shopping_needed, 2);
        assert!(!board.is_daily_empty());
    }

    #[test]
    fn shopping_overview_counts_needed_items_per_store() {
        let snapshot = sample();
        let overview = shopping_overview(&snapshot);

        assert_eq!(overview.len(), 2);
        assert_eq!((overview[0].needed, overview[0].total), (2, 3));
        assert_eq!((overview[1].needed, overview[1].total), (0, 0));
    }

    #[test]
    fn list_detail_for_unknown_store_is_empty() {
        let snapshot = sample();
        let detail = list_detail(&snapshot, 42);
        assert!(detail.store.is_none());
        assert!(detail.items.is_empty());

        let market = list_detail(&snapshot, 1);
        assert_eq!(market.store.map(|s| s.name.as_str()), Some("Market"));
        assert_eq!(market.items.len(), 3);
    }

    #[test]
    fn calendar_only_shows_timed_tasks() {
        let snapshot = sample();
        let events = calendar_events(&snapshot);
        let ids: Vec<_> = events.iter().map(|event| event.task_id).collect();
        assert_eq!(ids, [1, 3, 4]);
        assert_eq!(
            events[1].start,
            day(1).and_hms_opt(8, 0, 0).unwrap()
        );
    }

    #[test]
    fn journal_timeline_is_newest_first() {
        let mut snapshot = Snapshot::default();
        for (id, d) in [(1, 1), (2, 3), (3, 2)] {
            let mut entry = JournalEntry::new(day(d), format!("entry {id}"), "");
            entry.id = Some(id);
            snapshot.journal_entries.push(entry);
        }

        let ids: Vec<_> = journal_timeline(&snapshot)
            .iter()
            .map(|entry| entry.id)
            .collect();
        assert_eq!(ids, [Some(2), Some(3), Some(1)]);
    }
}
