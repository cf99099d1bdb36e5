//! Timetable slots, attendance marks and the report derived from them.

pub mod recorder;
pub mod report;
pub mod timetable;
pub mod weekday;
