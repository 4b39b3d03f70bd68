use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Canonical task timestamp: local wall-clock time with no zone attached
pub type Timestamp = NaiveDateTime;

/// Storage/display format for canonical timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Merge the calendar date of `date_part` with the time-of-day of `time_part`.
///
/// Whatever date `time_part` carries and whatever time `date_part` carries are
/// discarded. Sub-second precision is dropped. When `time_part` is absent the
/// time-of-day already in `date_part` is kept, and when `date_part` is absent
/// nothing is invented: `None` comes back.
pub fn combine(date_part: Option<Timestamp>, time_part: Option<Timestamp>) -> Option<Timestamp> {
    let date_part = date_part?;
    let time = time_part.unwrap_or(date_part).time();
    Some(date_part.date().and_time(whole_seconds(time)))
}

fn whole_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}

/// Current local time, truncated to whole seconds
pub fn now() -> Timestamp {
    let now = Local::now().naive_local();
    now.date().and_time(whole_seconds(now.time()))
}

/// Value a date picker yields: `date`, keeping the time-of-day of `current` (midnight if none)
pub fn pick_date(current: Option<Timestamp>, date: NaiveDate) -> Timestamp {
    let time = current.map(|ts| ts.time()).unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}

/// Value a time picker yields: `time`, on the date of `current` (epoch date if none)
pub fn pick_time(current: Option<Timestamp>, time: NaiveTime) -> Timestamp {
    let date = current.map(|ts| ts.date()).unwrap_or_default();
    date.and_time(time)
}

pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
