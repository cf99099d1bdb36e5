use crate::core::error::AppError;
use crate::models::timetable::TimetableEntry;
use crate::stores::store::Store;
use crate::tracking::weekday::WEEK;
use crate::validation::forms::NewSlot;
use chrono::{NaiveTime, Weekday};
use tracing::{info, warn};

/// One weekday of the home page timetable
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    pub day: Weekday,
    /// (subject, start time), earliest first
    pub classes: Vec<(String, NaiveTime)>,
}

impl DaySchedule {
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Add a weekly slot for `user_id`, rejecting a second subject at the same (day, time)
pub fn add_slot(store: &Store, user_id: u32, slot: NewSlot) -> Result<TimetableEntry, AppError> {
    let day = slot.day;
    let time = slot.time;

    let entry = store
        .insert_slot(user_id, slot.subject, day, time)
        .map_err(|e| {
            warn!(
                user_id = user_id,
                day = ?day,
                time = %time.format("%H:%M"),
                error = %e,
                "Timetable slot rejected"
            );
            AppError::from(e)
        })?;

    info!(
        user_id = user_id,
        slot_id = entry.id,
        subject = %entry.subject,
        day = ?entry.day,
        time = %entry.time_label(),
        "Timetable slot added"
    );

    Ok(entry)
}

/// The user's timetable grouped by weekday, Monday first
///
/// Days without classes are left out.
pub fn weekly_view(store: &Store, user_id: u32) -> Vec<DaySchedule> {
    let slots = store.slots_for_user(user_id);

    WEEK.into_iter()
        .filter_map(|day| {
            let mut classes: Vec<(String, NaiveTime)> = slots
                .iter()
                .filter(|slot| slot.day == day)
                .map(|slot| (slot.subject.clone(), slot.time))
                .collect();

            if classes.is_empty() {
                return None;
            }

            classes.sort_by_key(|(_, time)| *time);
            Some(DaySchedule { day, classes })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    fn new_slot(subject: &str, day: Weekday, hour: u32) -> NewSlot {
        NewSlot {
            subject: subject.to_string(),
            day,
            time: at(hour),
        }
    }

    fn store_with_users() -> (Store, u32, u32) {
        let store = Store::in_memory();
        let alice = store.insert_user("alice", "h".to_string()).unwrap().id;
        let bob = store.insert_user("bob", "h".to_string()).unwrap().id;
        (store, alice, bob)
    }

    #[test]
    fn test_duplicate_slot_for_same_user() {
        let (store, alice, _) = store_with_users();

        add_slot(&store, alice, new_slot("Math", Weekday::Mon, 9)).unwrap();
        let err = add_slot(&store, alice, new_slot("Physics", Weekday::Mon, 9)).unwrap_err();

        assert!(matches!(err, AppError::DuplicateSlot));
        assert_eq!(store.slots_for_user(alice).len(), 1);
    }

    #[test]
    fn test_same_slot_for_two_users() {
        let (store, alice, bob) = store_with_users();

        assert!(add_slot(&store, alice, new_slot("Math", Weekday::Mon, 9)).is_ok());
        assert!(add_slot(&store, bob, new_slot("Math", Weekday::Mon, 9)).is_ok());
    }

    #[test]
    fn test_weekly_view_groups_and_sorts() {
        let (store, alice, bob) = store_with_users();

        add_slot(&store, alice, new_slot("Physics", Weekday::Wed, 11)).unwrap();
        add_slot(&store, alice, new_slot("Math", Weekday::Mon, 10)).unwrap();
        add_slot(&store, alice, new_slot("Art", Weekday::Mon, 8)).unwrap();
        add_slot(&store, bob, new_slot("History", Weekday::Tue, 9)).unwrap();

        let week = weekly_view(&store, alice);

        assert_eq!(week.len(), 2);
        assert_eq!(week[0].day, Weekday::Mon);
        assert_eq!(
            week[0].classes,
            vec![("Art".to_string(), at(8)), ("Math".to_string(), at(10))]
        );
        assert_eq!(week[0].len(), 2);
        assert_eq!(week[1].day, Weekday::Wed);
        assert_eq!(week[1].len(), 1);
    }

    #[test]
    fn test_weekly_view_empty() {
        let (store, alice, _) = store_with_users();
        assert!(weekly_view(&store, alice).is_empty());
    }
}
