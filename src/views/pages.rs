use crate::models::attendance::AttendanceRecord;
use crate::models::report::AttendanceReport;
use crate::tracking::timetable::DaySchedule;
use crate::tracking::weekday::{weekday_name, WEEK};
use crate::views::html::{escape, layout};
use std::fmt::Write;

/// Error page carrying the status code and a human-readable message
pub fn apology(code: u16, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p class=\"apology\">{}</p>\n<p><a href=\"javascript:history.back()\">Go back</a></p>",
        code,
        escape(message)
    );
    layout("Apology", false, &body)
}

pub fn not_found() -> String {
    layout("Not Found", false, "<h1>404</h1>\n<p>Nothing to see here.</p>")
}

pub fn register_form() -> String {
    let body = "<h1>Register</h1>\n\
        <form action=\"/register\" method=\"post\">\n\
        <input autocomplete=\"off\" autofocus name=\"username\" placeholder=\"Username\" type=\"text\">\n\
        <input name=\"password\" placeholder=\"Password\" type=\"password\">\n\
        <input name=\"confirmation\" placeholder=\"Confirm password\" type=\"password\">\n\
        <button type=\"submit\">Register</button>\n\
        </form>";
    layout("Register", false, body)
}

pub fn login_form() -> String {
    let body = "<h1>Log In</h1>\n\
        <form action=\"/login\" method=\"post\">\n\
        <input autocomplete=\"off\" autofocus name=\"username\" placeholder=\"Username\" type=\"text\">\n\
        <input name=\"password\" placeholder=\"Password\" type=\"password\">\n\
        <button type=\"submit\">Log In</button>\n\
        </form>";
    layout("Log In", false, body)
}

/// Weekly timetable, one table row group per day
pub fn home(week: &[DaySchedule]) -> String {
    let mut body = String::from("<h1>Your timetable</h1>\n");

    if week.is_empty() {
        body.push_str("<p>No classes yet. <a href=\"/log\">Add one</a>.</p>");
        return layout("Timetable", true, &body);
    }

    body.push_str("<table>\n<thead><tr><th>Day</th><th>Subject</th><th>Time</th></tr></thead>\n<tbody>\n");
    for schedule in week {
        for (index, (subject, time)) in schedule.classes.iter().enumerate() {
            body.push_str("<tr>");
            if index == 0 {
                let _ = write!(
                    body,
                    "<td rowspan=\"{}\">{}</td>",
                    schedule.len(),
                    weekday_name(schedule.day)
                );
            }
            let _ = writeln!(
                body,
                "<td>{}</td><td>{}</td></tr>",
                escape(subject),
                time.format("%H:%M")
            );
        }
    }
    body.push_str("</tbody>\n</table>");

    layout("Timetable", true, &body)
}

/// Form for adding a weekly slot
pub fn log_form() -> String {
    let mut options = String::new();
    for day in WEEK {
        let name = weekday_name(day);
        let _ = write!(options, "<option value=\"{0}\">{0}</option>", name);
    }

    let body = format!(
        "<h1>Add a class</h1>\n\
        <form action=\"/log\" method=\"post\">\n\
        <input autocomplete=\"off\" autofocus name=\"subject\" placeholder=\"Subject\" type=\"text\">\n\
        <select name=\"day\">{}</select>\n\
        <input name=\"time\" type=\"time\">\n\
        <button type=\"submit\">Add</button>\n\
        </form>",
        options
    );
    layout("Add class", true, &body)
}

/// Form for marking a day, followed by the days already marked
pub fn attendance_form(history: &[AttendanceRecord]) -> String {
    let mut body = String::from(
        "<h1>Mark attendance</h1>\n\
        <form action=\"/attendance\" method=\"post\">\n\
        <input name=\"date\" type=\"date\">\n\
        <select name=\"status\"><option value=\"present\">Present</option><option value=\"absent\">Absent</option></select>\n\
        <button type=\"submit\">Save</button>\n\
        </form>\n",
    );

    if !history.is_empty() {
        body.push_str("<h2>Recorded days</h2>\n<ul>\n");
        for record in history {
            let _ = writeln!(
                body,
                "<li>{} ({}): {}</li>",
                record.date.format("%Y-%m-%d"),
                record.date.format("%A"),
                record.status
            );
        }
        body.push_str("</ul>");
    }

    layout("Mark attendance", true, &body)
}

/// Per-subject attendance table plus the overall figure
pub fn report(report: &AttendanceReport) -> String {
    let mut body = String::from("<h1>Attendance report</h1>\n");

    if report.subjects.is_empty() {
        body.push_str("<p>No classes in your timetable yet.</p>");
        return layout("Report", true, &body);
    }

    body.push_str(
        "<table>\n<thead><tr><th>Subject</th><th>Attended</th><th>Absent</th><th>Total</th><th>Percentage</th></tr></thead>\n<tbody>\n",
    );
    for (subject, tally) in &report.subjects {
        let percentage = match tally.percentage {
            Some(p) => format!("{:.2}%", p),
            None => "No data".to_string(),
        };
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(subject),
            tally.attended,
            tally.absent,
            tally.total,
            percentage
        );
    }
    body.push_str("</tbody>\n</table>\n");

    if !report.has_data() {
        body.push_str("<p class=\"overall\">No attendance recorded yet.</p>");
    } else if let Some(overall) = report.overall_percentage {
        let _ = write!(body, "<p class=\"overall\">Overall attendance: {:.2}%</p>", overall);
    }

    layout("Report", true, &body)
}
