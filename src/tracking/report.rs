use crate::core::error::ReportError;
use crate::models::attendance::{AttendanceRecord, AttendanceStatus};
use crate::models::report::{AttendanceReport, SubjectTally};
use crate::models::timetable::TimetableEntry;
use crate::stores::store::Store;
use crate::tracking::weekday::weekday_of;
use chrono::Weekday;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// How attendance dates are matched against timetable slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    /// Every date is matched against every slot the user has, whatever its
    /// day. Counts line up with the day grouping only when the weekday
    /// happens to match, so a subject scheduled twice in a week collects
    /// both slots on each of its days.
    #[default]
    Unfiltered,
    /// A date only counts slots scheduled on the date's weekday
    Weekday,
}

#[derive(Debug, Clone, Copy, Default)]
struct DayTally {
    attended: u32,
    absent: u32,
}

/// Build the attendance report for one user from the rows currently stored
///
/// Read-only; calling it twice without an intervening write gives the same report.
pub fn compute_report(store: &Store, user_id: u32, mode: JoinMode) -> AttendanceReport {
    let timetable = store.slots_for_user(user_id);
    let attendance = store.attendance_for_user(user_id);

    debug!(
        user_id = user_id,
        slots = timetable.len(),
        records = attendance.len(),
        join_mode = ?mode,
        "Computing attendance report"
    );

    build_report(&timetable, &attendance, mode)
}

pub fn build_report(
    timetable: &[TimetableEntry],
    attendance: &[AttendanceRecord],
    mode: JoinMode,
) -> AttendanceReport {
    // Attendance folded onto (weekday, subject), summed over every date on that weekday
    let mut by_day: HashMap<(Weekday, &str), DayTally> = HashMap::new();

    for record in attendance {
        let weekday = weekday_of(record.date);

        let matched = timetable
            .iter()
            .filter(|slot| mode == JoinMode::Unfiltered || slot.day == weekday);

        for slot in matched {
            let tally = by_day.entry((weekday, slot.subject.as_str())).or_default();
            match record.status {
                AttendanceStatus::Present => tally.attended += 1,
                AttendanceStatus::Absent => tally.absent += 1,
            }
        }
    }

    // Each scheduled (day, subject) pair contributes once, however many slots it has
    let mut subjects: BTreeMap<String, SubjectTally> = BTreeMap::new();
    let mut seen: HashSet<(Weekday, &str)> = HashSet::new();

    for slot in timetable {
        let key = (slot.day, slot.subject.as_str());
        if !seen.insert(key) {
            continue;
        }

        let day = by_day.get(&key).copied().unwrap_or_default();
        subjects
            .entry(slot.subject.clone())
            .or_default()
            .add(day.attended, day.absent);
    }

    for tally in subjects.values_mut() {
        tally.percentage = percentage(tally.attended as u64, tally.total as u64);
    }

    let overall_percentage = overall_percentage(subjects.values()).ok();

    AttendanceReport {
        subjects,
        overall_percentage,
    }
}

/// `100 * part / whole`, or `None` when `whole` is zero
pub fn percentage(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(part as f64 * 100.0 / whole as f64)
}

/// Attended classes over all recorded classes across every subject
pub fn overall_percentage<'a, I>(tallies: I) -> Result<f64, ReportError>
where
    I: IntoIterator<Item = &'a SubjectTally>,
{
    let (attended, total) = tallies
        .into_iter()
        .fold((0u64, 0u64), |(attended, total), tally| {
            (attended + tally.attended as u64, total + tally.total as u64)
        });

    percentage(attended, total).ok_or(ReportError::NoAttendanceData)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn slot(id: u32, subject: &str, day: Weekday, hour: u32) -> TimetableEntry {
        TimetableEntry::new(
            id,
            1,
            subject.to_string(),
            day,
            NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        )
    }

    fn mark(id: u32, y: i32, m: u32, d: u32, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord::new(id, 1, NaiveDate::from_ymd_opt(y, m, d).unwrap(), status)
    }

    #[test]
    fn test_single_subject_half_attended() {
        let timetable = vec![slot(1, "Math", Weekday::Mon, 9)];
        let attendance = vec![
            mark(1, 2024, 1, 1, AttendanceStatus::Present),
            mark(2, 2024, 1, 8, AttendanceStatus::Absent),
        ];

        let report = build_report(&timetable, &attendance, JoinMode::Unfiltered);

        let math = &report.subjects["Math"];
        assert_eq!(math.attended, 1);
        assert_eq!(math.absent, 1);
        assert_eq!(math.total, 2);
        assert_eq!(math.percentage, Some(50.0));
        assert_eq!(report.overall_percentage, Some(50.0));
    }

    #[test]
    fn test_unattended_subject_has_zero_total() {
        let timetable = vec![
            slot(1, "Math", Weekday::Mon, 9),
            slot(2, "Physics", Weekday::Tue, 9),
        ];
        // 2024-01-01 is a Monday
        let attendance = vec![mark(1, 2024, 1, 1, AttendanceStatus::Present)];

        for mode in [JoinMode::Unfiltered, JoinMode::Weekday] {
            let report = build_report(&timetable, &attendance, mode);

            let physics = &report.subjects["Physics"];
            assert_eq!(physics.total, 0);
            assert_eq!(physics.percentage, None);
            assert_eq!(report.subjects["Math"].total, 1);
            assert_eq!(report.overall_percentage, Some(100.0));
        }
    }

    #[test]
    fn test_no_attendance_is_no_data_not_a_fault() {
        let timetable = vec![
            slot(1, "Math", Weekday::Mon, 9),
            slot(2, "Physics", Weekday::Tue, 9),
        ];

        let report = build_report(&timetable, &[], JoinMode::Unfiltered);

        assert_eq!(report.subjects.len(), 2);
        assert!(report.subjects.values().all(|t| t.total == 0));
        assert_eq!(report.overall_percentage, None);
        assert!(!report.has_data());
        assert_eq!(
            overall_percentage(report.subjects.values()),
            Err(ReportError::NoAttendanceData)
        );
    }

    #[test]
    fn test_empty_timetable_yields_empty_report() {
        let attendance = vec![mark(1, 2024, 1, 1, AttendanceStatus::Present)];
        let report = build_report(&[], &attendance, JoinMode::Unfiltered);

        assert!(report.subjects.is_empty());
        assert_eq!(report.overall_percentage, None);
    }

    #[test]
    fn test_unfiltered_join_counts_every_slot_of_subject() {
        // Math twice a week; a Monday date joins both Math rows
        let timetable = vec![
            slot(1, "Math", Weekday::Mon, 9),
            slot(2, "Math", Weekday::Wed, 9),
        ];
        let attendance = vec![mark(1, 2024, 1, 1, AttendanceStatus::Present)];

        let unfiltered = build_report(&timetable, &attendance, JoinMode::Unfiltered);
        assert_eq!(unfiltered.subjects["Math"].attended, 2);

        let filtered = build_report(&timetable, &attendance, JoinMode::Weekday);
        assert_eq!(filtered.subjects["Math"].attended, 1);
    }

    #[test]
    fn test_unscheduled_weekday_is_ignored() {
        // 2024-01-06 is a Saturday; nothing is scheduled then
        let timetable = vec![slot(1, "Math", Weekday::Mon, 9)];
        let attendance = vec![mark(1, 2024, 1, 6, AttendanceStatus::Present)];

        for mode in [JoinMode::Unfiltered, JoinMode::Weekday] {
            let report = build_report(&timetable, &attendance, mode);
            assert_eq!(report.subjects["Math"].total, 0);
            assert_eq!(report.overall_percentage, None);
        }
    }

    #[test]
    fn test_weekday_mode_counts_each_slot_on_day() {
        let timetable = vec![
            slot(1, "Math", Weekday::Mon, 9),
            slot(2, "Math", Weekday::Mon, 11),
            slot(3, "Art", Weekday::Mon, 14),
        ];
        let attendance = vec![
            mark(1, 2024, 1, 1, AttendanceStatus::Present),
            mark(2, 2024, 1, 8, AttendanceStatus::Absent),
            mark(3, 2024, 1, 15, AttendanceStatus::Present),
        ];

        let report = build_report(&timetable, &attendance, JoinMode::Weekday);

        let math = &report.subjects["Math"];
        assert_eq!((math.attended, math.absent, math.total), (4, 2, 6));
        let art = &report.subjects["Art"];
        assert_eq!((art.attended, art.absent, art.total), (2, 1, 3));

        let overall = report.overall_percentage.unwrap();
        assert!((overall - 600.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_subjects_are_ordered_by_name() {
        let timetable = vec![
            slot(1, "Physics", Weekday::Mon, 9),
            slot(2, "Art", Weekday::Tue, 9),
            slot(3, "Math", Weekday::Wed, 9),
        ];
        let report = build_report(&timetable, &[], JoinMode::Unfiltered);

        let names: Vec<&str> = report.subjects.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Art", "Math", "Physics"]);
    }

    #[test]
    fn test_percentage_helper() {
        assert_eq!(percentage(0, 0), None);
        assert_eq!(percentage(0, 4), Some(0.0));
        assert_eq!(percentage(3, 4), Some(75.0));
    }

    #[test]
    fn test_compute_report_is_repeatable() {
        let store = Store::in_memory();
        let user = store.insert_user("alice", "hash".to_string()).unwrap();
        store
            .insert_slot(
                user.id,
                "Math".to_string(),
                Weekday::Mon,
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            )
            .unwrap();
        store
            .insert_attendance(
                user.id,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                AttendanceStatus::Present,
            )
            .unwrap();

        let first = compute_report(&store, user.id, JoinMode::Unfiltered);
        let second = compute_report(&store, user.id, JoinMode::Unfiltered);

        assert_eq!(first, second);
        assert_eq!(store.attendance_count(), 1);
        assert_eq!(store.slot_count(), 1);
    }
}
