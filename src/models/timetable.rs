use chrono::{NaiveTime, Weekday};

/// A recurring weekly class slot owned by one user
#[derive(Clone, Debug, PartialEq)]
pub struct TimetableEntry {
    /// Slot ID, assigned by the store
    pub id: u32,
    /// Owning user
    pub user_id: u32,
    /// Subject taught in this slot
    pub subject: String,
    /// Day of the week the slot recurs on
    pub day: Weekday,
    /// Start time of the slot
    pub time: NaiveTime,
}

impl TimetableEntry {
    pub fn new(id: u32, user_id: u32, subject: String, day: Weekday, time: NaiveTime) -> Self {
        Self {
            id,
            user_id,
            subject,
            day,
            time,
        }
    }

    /// Whether this entry already sits in the given (day, time) slot
    pub fn occupies(&self, day: Weekday, time: NaiveTime) -> bool {
        self.day == day && self.time == time
    }

    /// Start time rendered as `HH:MM`
    pub fn time_label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}
