use std::fmt::Write;

/// Escape text for use inside HTML element content or a quoted attribute
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap page content in the shared document shell and navigation
pub fn layout(title: &str, logged_in: bool, body: &str) -> String {
    let mut page = String::with_capacity(body.len() + 512);

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(page, "<title>Attendance: {}</title>", escape(title));
    page.push_str("</head>\n<body>\n<nav>\n");

    if logged_in {
        page.push_str(
            "<a href=\"/\">Timetable</a> | <a href=\"/log\">Add class</a> | \
             <a href=\"/attendance\">Mark attendance</a> | <a href=\"/report\">Report</a> | \
             <a href=\"/logout\">Log out</a>\n",
        );
    } else {
        page.push_str("<a href=\"/register\">Register</a> | <a href=\"/login\">Log in</a>\n");
    }

    page.push_str("</nav>\n<main>\n");
    page.push_str(body);
    page.push_str("\n</main>\n</body>\n</html>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(
            escape("<script>alert(\"x\" & 'y')</script>"),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_layout_navigation_depends_on_login() {
        let anonymous = layout("Log In", false, "<p>body</p>");
        assert!(anonymous.contains("href=\"/login\""));
        assert!(!anonymous.contains("href=\"/logout\""));
        assert!(anonymous.contains("<p>body</p>"));

        let member = layout("Report", true, "");
        assert!(member.contains("href=\"/logout\""));
        assert!(member.contains("<title>Attendance: Report</title>"));
    }
}
