use crate::analyze::calendar_stat;
use chrono::{Datelike, NaiveDateTime, Timelike};

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Human display string for an event relative to `now`.
///
/// Same-day events show only the time (`9:05 am`). Older events show
/// `August 13 9:05 am`, with `, 2014` after the day when the event falls in an
/// earlier year than `now`.
pub fn format_display(ts: NaiveDateTime, now: NaiveDateTime) -> String {
    if ts.date() == now.date() {
        return clock(ts);
    }
    let mut out = format!("{} {}", MONTHS[ts.month0() as usize], ts.day());
    if ts.year() < now.year() {
        out.push_str(&format!(", {}", ts.year()));
    }
    out.push(' ');
    out.push_str(&clock(ts));
    out
}

/// 12-hour clock. Only hours past 12 count as pm, so noon reads `12:00 am`.
fn clock(ts: NaiveDateTime) -> String {
    let hour = ts.hour();
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    let suffix = if hour > 12 { "pm" } else { "am" };
    format!("{display_hour}:{:02} {suffix}", ts.minute())
}

/// Coarse recency label such as `3 days` or `1 minute`.
pub fn time_since(ts: NaiveDateTime, now: NaiveDateTime) -> String {
    calendar_stat(now, ts).to_string()
}
