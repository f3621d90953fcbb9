use chrono::{DateTime, Local};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;
    pub const MS_IN_W: i64 = Self::MS_IN_D * 7;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";

    /// Shorthand for the bar interval (only daily and weekly bars exist here).
    pub fn interval_to_string(interval_ms: i64) -> &'static str {
        match interval_ms {
            Self::MS_IN_D => "1d",
            Self::MS_IN_W => "1w",
            _ => "unknown",
        }
    }
}

/// Format an epoch-milliseconds timestamp as a display date (UTC).
pub fn epoch_ms_to_date(epoch_ms: i64) -> String {
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format(TimeUtils::STANDARD_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

pub fn local_now_as_timestamp_ms() -> i64 {
    let now_local = Local::now();
    now_local.timestamp_millis()
}

pub fn how_many_seconds_ago(past_timestamp_ms: i64) -> i64 {
    // How many seconds ago was the event described by `past_timestamp_ms` ?
    let now_timestamp_ms = local_now_as_timestamp_ms();
    (now_timestamp_ms - past_timestamp_ms) / 1000
}
