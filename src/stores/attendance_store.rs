use crate::core::error::{Constraint, StoreError};
use crate::models::attendance::{AttendanceRecord, AttendanceStatus};
use chrono::NaiveDate;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// In-memory attendance table, one date-ordered map per user
pub struct AttendanceStore {
    records: DashMap<u32, BTreeMap<NaiveDate, AttendanceRecord>>,
    next_id: AtomicU32,
}

impl AttendanceStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU32::new(1),
        }
    }

    /// Insert a record unless the user already marked this date
    pub fn insert_with<F>(
        &self,
        user_id: u32,
        date: NaiveDate,
        status: AttendanceStatus,
        persist: F,
    ) -> Result<AttendanceRecord, StoreError>
    where
        F: FnOnce(&AttendanceRecord) -> anyhow::Result<()>,
    {
        let mut records = self.records.entry(user_id).or_default();

        if records.contains_key(&date) {
            return Err(StoreError::ConstraintViolation(Constraint::UniqueAttendanceDate));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = AttendanceRecord::new(id, user_id, date, status);

        persist(&record)?;

        records.insert(date, record.clone());
        Ok(record)
    }

    /// Put back a record read from the WAL
    /// Returns false if the date is already marked or the id is `u32::MAX`
    pub fn restore(&self, record: AttendanceRecord) -> bool {
        let Some(next_id) = record.id.checked_add(1) else {
            return false;
        };

        let mut records = self.records.entry(record.user_id).or_default();

        if records.contains_key(&record.date) {
            return false;
        }

        self.next_id.fetch_max(next_id, Ordering::SeqCst);
        records.insert(record.date, record);
        true
    }

    /// All records of one user, oldest date first
    pub fn for_user(&self, user_id: u32) -> Vec<AttendanceRecord> {
        self.records
            .get(&user_id)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AttendanceStore {
    fn default() -> Self {
        Self::new()
    }
}
