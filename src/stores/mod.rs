pub mod attendance_store;
pub mod store;
pub mod timetable_store;
pub mod user_store;
