use crate::core::error::{Constraint, StoreError};
use crate::models::timetable::TimetableEntry;
use chrono::{NaiveTime, Weekday};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// In-memory timetable table, grouped by owning user
pub struct TimetableStore {
    slots: DashMap<u32, Vec<TimetableEntry>>,
    next_id: AtomicU32,
}

impl TimetableStore {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            next_id: AtomicU32::new(1),
        }
    }

    /// Insert a slot unless the user already has one at (day, time)
    ///
    /// The user's shard is held across check, persist and insert.
    pub fn insert_with<F>(
        &self,
        user_id: u32,
        subject: String,
        day: Weekday,
        time: NaiveTime,
        persist: F,
    ) -> Result<TimetableEntry, StoreError>
    where
        F: FnOnce(&TimetableEntry) -> anyhow::Result<()>,
    {
        let mut slots = self.slots.entry(user_id).or_default();

        if slots.iter().any(|slot| slot.occupies(day, time)) {
            return Err(StoreError::ConstraintViolation(Constraint::UniqueSlot));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let entry = TimetableEntry::new(id, user_id, subject, day, time);

        persist(&entry)?;

        slots.push(entry.clone());
        Ok(entry)
    }

    /// Put back a slot read from the WAL
    /// Returns false if its (day, time) is already taken or its id is `u32::MAX`
    pub fn restore(&self, entry: TimetableEntry) -> bool {
        let Some(next_id) = entry.id.checked_add(1) else {
            return false;
        };

        let mut slots = self.slots.entry(entry.user_id).or_default();

        if slots.iter().any(|slot| slot.occupies(entry.day, entry.time)) {
            return false;
        }

        self.next_id.fetch_max(next_id, Ordering::SeqCst);
        slots.push(entry);
        true
    }

    /// All slots of one user in insertion order
    pub fn for_user(&self, user_id: u32) -> Vec<TimetableEntry> {
        self.slots
            .get(&user_id)
            .map(|slots| slots.value().clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TimetableStore {
    fn default() -> Self {
        Self::new()
    }
}
