use chrono::{DateTime, Duration, NaiveDateTime, Utc};

#[must_use]
pub fn wind_kmh(meters_per_second: f32) -> i32 {
    (meters_per_second * 3.6).round() as i32
}

#[must_use]
pub fn round_temp(value: f32) -> i32 {
    value.round() as i32
}

/// Wall-clock time at a location `utc_offset_secs` away from UTC.
#[must_use]
pub fn local_datetime(instant: DateTime<Utc>, utc_offset_secs: i32) -> NaiveDateTime {
    instant.naive_utc() + Duration::seconds(i64::from(utc_offset_secs))
}

#[must_use]
pub fn format_clock(instant: DateTime<Utc>, utc_offset_secs: i32) -> String {
    local_datetime(instant, utc_offset_secs)
        .format("%H:%M")
        .to_string()
}
