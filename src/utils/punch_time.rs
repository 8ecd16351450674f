use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Wire format BioTime uses for `punch_time`, `start_time` and `end_time`.
pub const PUNCH_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const ACCEPTED_PUNCH_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parses a punch timestamp. Returns `None` for anything malformed.
pub fn parse_punch_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ACCEPTED_PUNCH_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parses `HH:MM:SS` or `HH:MM`.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

pub fn format_punch_time(dt: &NaiveDateTime) -> String {
    dt.format(PUNCH_TIME_FORMAT).to_string()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a non-negative duration as `H:MM:SS`.
pub fn format_duration(delta: TimeDelta) -> String {
    let secs = delta.num_seconds().max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
