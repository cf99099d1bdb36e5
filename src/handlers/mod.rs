pub mod attendance;
pub mod auth;
pub mod fallback;
pub mod health;
pub mod metrics;
pub mod report;
pub mod timetable;
