//! List helpers shared by the bookmark, todo and note managers.
//!
//! Every manager follows the same pipeline: compute the new list in memory
//! with one of these functions, then persist the whole list under its key.

use crate::models::{Bookmark, Note, Todo};
use crate::utils::Clock;

pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for Bookmark {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Todo {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Note {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Timestamp-shaped id that is unique within `items`.
///
/// Uses the clock's millisecond timestamp; when two inserts land on the same
/// millisecond (or the clock is behind an existing id) the next free value
/// above the current maximum is used instead.
pub fn next_id<T: Identified>(clock: &dyn Clock, items: &[T]) -> i64 {
    let now = clock.now_millis();
    if items.iter().any(|item| item.id() == now) {
        items.iter().map(Identified::id).max().unwrap_or(now) + 1
    } else {
        now
    }
}

/// Remove the item with `id`; returns whether anything changed
pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: i64) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

/// Apply `f` to the item with `id`; returns whether it was found
pub fn update_by_id<T: Identified>(items: &mut [T], id: i64, f: impl FnOnce(&mut T)) -> bool {
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            f(item);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_support::FixedClock;
    use chrono::NaiveDate;

    fn todo(id: i64) -> Todo {
        Todo {
            id,
            text: format!("t{id}"),
            completed: false,
        }
    }

    fn clock(millis: i64) -> FixedClock {
        FixedClock::new(millis, NaiveDate::from_ymd_opt(2026, 10, 15).unwrap())
    }

    #[test]
    fn next_id_uses_timestamp_when_free() {
        assert_eq!(next_id(&clock(1_000), &[todo(1), todo(2)]), 1_000);
    }

    #[test]
    fn next_id_bumps_on_same_millisecond() {
        let items = vec![todo(1_000), todo(1_001)];
        assert_eq!(next_id(&clock(1_000), &items), 1_002);
    }

    #[test]
    fn remove_and_update_report_misses() {
        let mut items = vec![todo(1), todo(2)];
        assert!(!remove_by_id(&mut items, 9));
        assert!(!update_by_id(&mut items, 9, |t| t.completed = true));
        assert!(remove_by_id(&mut items, 1));
        assert_eq!(items, vec![todo(2)]);
    }
}
