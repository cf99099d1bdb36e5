use crate::core::error::AppError;
use crate::models::attendance::AttendanceRecord;
use crate::stores::store::Store;
use crate::validation::forms::NewAttendance;
use tracing::{info, warn};

/// Mark a whole calendar day as attended or missed
///
/// A date can be marked once per user, not once per subject.
pub fn record_attendance(
    store: &Store,
    user_id: u32,
    attendance: NewAttendance,
) -> Result<AttendanceRecord, AppError> {
    let date = attendance.date;

    let record = store
        .insert_attendance(user_id, date, attendance.status)
        .map_err(|e| {
            warn!(user_id = user_id, date = %date, error = %e, "Attendance rejected");
            AppError::from(e)
        })?;

    info!(
        user_id = user_id,
        record_id = record.id,
        date = %record.date,
        status = %record.status,
        "Attendance recorded"
    );

    Ok(record)
}

/// Previously recorded days, newest first
pub fn history(store: &Store, user_id: u32) -> Vec<AttendanceRecord> {
    let mut records = store.attendance_for_user(user_id);
    records.reverse();
    records
}
