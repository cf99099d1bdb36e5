use crate::core::error::StoreError;
use crate::models::attendance::{AttendanceRecord, AttendanceStatus};
use crate::models::timetable::TimetableEntry;
use crate::models::user::User;
use crate::stores::attendance_store::AttendanceStore;
use crate::stores::timetable_store::TimetableStore;
use crate::stores::user_store::UserStore;
use crate::wal::wal::{Wal, WalOperation};
use chrono::{NaiveDate, NaiveTime, Weekday};
use std::sync::Arc;

/// The three tables plus the WAL that makes them durable
///
/// Every accepted insert is written to the WAL before it becomes visible.
/// Without a WAL (tests) the store is purely in-memory.
pub struct Store {
    users: UserStore,
    timetable: TimetableStore,
    attendance: AttendanceStore,
    wal: Option<Wal>,
}

impl Store {
    pub fn new(wal: Wal) -> Self {
        Self {
            users: UserStore::new(),
            timetable: TimetableStore::new(),
            attendance: AttendanceStore::new(),
            wal: Some(wal),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: UserStore::new(),
            timetable: TimetableStore::new(),
            attendance: AttendanceStore::new(),
            wal: None,
        }
    }

    pub fn wal(&self) -> Option<&Wal> {
        self.wal.as_ref()
    }

    fn log(&self, op: WalOperation) -> anyhow::Result<()> {
        match &self.wal {
            Some(wal) => wal.log_operation(&op),
            None => Ok(()),
        }
    }

    pub fn insert_user(&self, username: &str, password_hash: String) -> Result<Arc<User>, StoreError> {
        self.users.insert_with(username, password_hash, |user| {
            self.log(WalOperation::AddUser {
                id: user.id,
                username: user.username.clone(),
                password_hash: user.password_hash.clone(),
            })
        })
    }

    pub fn insert_slot(
        &self,
        user_id: u32,
        subject: String,
        day: Weekday,
        time: NaiveTime,
    ) -> Result<TimetableEntry, StoreError> {
        if !self.users.contains(user_id) {
            return Err(StoreError::UnknownUser(user_id));
        }

        self.timetable.insert_with(user_id, subject, day, time, |entry| {
            self.log(WalOperation::AddSlot {
                id: entry.id,
                user_id: entry.user_id,
                subject: entry.subject.clone(),
                day: entry.day,
                time: entry.time,
            })
        })
    }

    pub fn insert_attendance(
        &self,
        user_id: u32,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord, StoreError> {
        if !self.users.contains(user_id) {
            return Err(StoreError::UnknownUser(user_id));
        }

        self.attendance.insert_with(user_id, date, status, |record| {
            self.log(WalOperation::RecordAttendance {
                id: record.id,
                user_id: record.user_id,
                date: record.date,
                status: record.status,
            })
        })
    }

    /// Apply one replayed WAL operation without logging it again
    ///
    /// Returns false when the row was rejected (duplicate key or a
    /// reference to a user the log never created).
    pub fn restore(&self, op: &WalOperation) -> bool {
        match op {
            WalOperation::AddUser {
                id,
                username,
                password_hash,
            } => self
                .users
                .restore(User::new(*id, username.clone(), password_hash.clone())),
            WalOperation::AddSlot {
                id,
                user_id,
                subject,
                day,
                time,
            } => {
                self.users.contains(*user_id)
                    && self.timetable.restore(TimetableEntry::new(
                        *id,
                        *user_id,
                        subject.clone(),
                        *day,
                        *time,
                    ))
            }
            WalOperation::RecordAttendance {
                id,
                user_id,
                date,
                status,
            } => {
                self.users.contains(*user_id)
                    && self
                        .attendance
                        .restore(AttendanceRecord::new(*id, *user_id, *date, *status))
            }
        }
    }

    pub fn user_by_name(&self, username: &str) -> Option<Arc<User>> {
        self.users.get_by_name(username)
    }

    pub fn user_by_id(&self, user_id: u32) -> Option<Arc<User>> {
        self.users.get_by_id(user_id)
    }

    pub fn slots_for_user(&self, user_id: u32) -> Vec<TimetableEntry> {
        self.timetable.for_user(user_id)
    }

    pub fn attendance_for_user(&self, user_id: u32) -> Vec<AttendanceRecord> {
        self.attendance.for_user(user_id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn slot_count(&self) -> usize {
        self.timetable.len()
    }

    pub fn attendance_count(&self) -> usize {
        self.attendance.len()
    }
}
