pub mod attendance;
pub mod report;
pub mod timetable;
pub mod user;
