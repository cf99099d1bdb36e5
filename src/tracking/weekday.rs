//! Fixed, locale-independent mapping between calendar dates and weekday names.

use chrono::{Datelike, NaiveDate, Weekday};

/// Calendar order used for display
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a full English weekday name, ignoring case and surrounding whitespace
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let name = name.trim();
    WEEK.into_iter()
        .find(|day| weekday_name(*day).eq_ignore_ascii_case(name))
}

/// Gregorian weekday of a date
pub fn weekday_of(date: NaiveDate) -> Weekday {
    date.weekday()
}
