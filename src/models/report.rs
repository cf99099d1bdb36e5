use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attendance totals for one subject across every weekday it is scheduled on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectTally {
    pub attended: u32,
    pub absent: u32,
    pub total: u32,
    /// `None` while the subject has no recorded classes
    pub percentage: Option<f64>,
}

impl SubjectTally {
    pub fn add(&mut self, attended: u32, absent: u32) {
        self.attended += attended;
        self.absent += absent;
        self.total += attended + absent;
    }
}

/// Per-subject attendance plus the overall figure for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceReport {
    /// Keyed by subject name, so iteration is alphabetical
    pub subjects: BTreeMap<String, SubjectTally>,
    /// `None` when nothing has been recorded for any scheduled subject
    pub overall_percentage: Option<f64>,
}

impl AttendanceReport {
    pub fn has_data(&self) -> bool {
        self.overall_percentage.is_some()
    }
}
