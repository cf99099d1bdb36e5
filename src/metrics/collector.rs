use crate::security::sessions::SessionStore;
use crate::stores::store::Store;
use crate::utils::time::current_timestamp;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Metrics {
    pub registrations: AtomicU64,
    pub successful_logins: AtomicU64,
    pub failed_logins: AtomicU64,
    pub slots_added: AtomicU64,
    pub attendance_recorded: AtomicU64,
    pub reports_served: AtomicU64,
    /// Writes refused by validation or a uniqueness constraint
    pub rejected_writes: AtomicU64,
    pub start_time: i64,
}

#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub registrations: u64,
    pub successful_logins: u64,
    pub failed_logins: u64,
    pub login_success_rate: f64,
    pub slots_added: u64,
    pub attendance_recorded: u64,
    pub reports_served: u64,
    pub rejected_writes: u64,
    pub users: usize,
    pub timetable_entries: usize,
    pub attendance_records: usize,
    pub active_sessions: usize,
    pub uptime_seconds: i64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            registrations: AtomicU64::new(0),
            successful_logins: AtomicU64::new(0),
            failed_logins: AtomicU64::new(0),
            slots_added: AtomicU64::new(0),
            attendance_recorded: AtomicU64::new(0),
            reports_served: AtomicU64::new(0),
            rejected_writes: AtomicU64::new(0),
            start_time: current_timestamp(),
        }
    }

    pub fn increment_registrations(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_successful_logins(&self) {
        self.successful_logins.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed_logins(&self) {
        self.failed_logins.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_slots_added(&self) {
        self.slots_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_attendance_recorded(&self) {
        self.attendance_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reports_served(&self) {
        self.reports_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected_writes(&self) {
        self.rejected_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Collects counters plus table and session sizes, and derives the
    /// login success rate and uptime.
    pub fn get_snapshot(&self, store: &Store, sessions: &SessionStore) -> MetricsSnapshot {
        let now = current_timestamp();
        let successful_logins = self.successful_logins.load(Ordering::Relaxed);
        let failed_logins = self.failed_logins.load(Ordering::Relaxed);
        let attempts = successful_logins + failed_logins;

        let login_success_rate = if attempts > 0 {
            (successful_logins as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };

        MetricsSnapshot {
            registrations: self.registrations.load(Ordering::Relaxed),
            successful_logins,
            failed_logins,
            login_success_rate,
            slots_added: self.slots_added.load(Ordering::Relaxed),
            attendance_recorded: self.attendance_recorded.load(Ordering::Relaxed),
            reports_served: self.reports_served.load(Ordering::Relaxed),
            rejected_writes: self.rejected_writes.load(Ordering::Relaxed),
            users: store.user_count(),
            timetable_entries: store.slot_count(),
            attendance_records: store.attendance_count(),
            active_sessions: sessions.live_count(now),
            uptime_seconds: now - self.start_time,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
