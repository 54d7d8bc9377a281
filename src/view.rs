//! HTML rendering helpers shared by the view-models.
//!
//! All user-controlled text goes through [`escape_html`] before it is
//! placed in markup, so names and message bodies always render literally.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::api::Friend;

/// Placeholder shown as the first option of every friend select.
pub const SELECT_PLACEHOLDER: &str = "Select a friend";

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Classes for a modal overlay in the given visibility.
pub fn modal_classes(open: bool) -> &'static str {
    if open {
        "fixed inset-0 bg-black bg-opacity-50 items-center justify-center flex"
    } else {
        "fixed inset-0 bg-black bg-opacity-50 items-center justify-center hidden"
    }
}

/// Format a currency amount with two decimals, e.g. `$98.00`.
pub fn format_money(amount: f64) -> String {
    // Avoid printing "-0.00".
    let amount = if amount == 0.0 { 0.0 } else { amount };
    format!("${amount:.2}")
}

/// Render the `<option>` list of a friend select.
///
/// The option whose value equals `selected` is marked selected.
pub fn friend_options(friends: &[Friend], selected: &str) -> String {
    let mut html = format!(r#"<option value="">{SELECT_PLACEHOLDER}</option>"#);
    for friend in friends {
        let value = friend.id.to_string();
        let marker = if value == selected.trim() { " selected" } else { "" };
        html.push_str(&format!(
            r#"<option value="{value}"{marker}>{}</option>"#,
            escape_html(&friend.name)
        ));
    }
    html
}

/// Parse an ISO-8601 timestamp the way a browser `Date` would.
///
/// Offsets are honoured; timestamps without an offset are local time;
/// bare dates are UTC midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}

/// Local time-of-day label for a message timestamp, e.g. `2:05:09 PM`.
pub fn time_of_day(raw: &str) -> String {
    parse_timestamp(raw).map_or_else(
        || "Invalid Date".to_string(),
        |dt| dt.format("%-I:%M:%S %p").to_string(),
    )
}
