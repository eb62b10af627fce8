//! Day/night derivation from sunrise, sunset and a UTC offset.
//!
//! The comparison works on seconds-of-day only. A sunrise that falls after
//! the sunset once shifted to local time (polar days, or windows crossing
//! local midnight) is compared as-is and not unwrapped.

use chrono::{DateTime, Timelike, Utc};
use thiserror::Error;

use crate::domain::weather::{CurrentWeather, local_datetime};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DaylightError {
    #[error("no weather snapshot available")]
    MissingSnapshot,
    #[error("unreadable {field} value")]
    MalformedSolarTime { field: &'static str },
}

/// Seconds since local midnight of `instant` at `utc_offset_secs` from UTC.
#[must_use]
pub fn seconds_of_day(instant: DateTime<Utc>, utc_offset_secs: i32) -> u32 {
    local_datetime(instant, utc_offset_secs)
        .time()
        .num_seconds_from_midnight()
}

/// Night holds strictly before sunrise or strictly after sunset; both
/// boundaries count as day.
#[must_use]
pub fn is_night_time(
    now: DateTime<Utc>,
    utc_offset_secs: i32,
    sunrise: DateTime<Utc>,
    sunset: DateTime<Utc>,
) -> bool {
    let now_sod = seconds_of_day(now, utc_offset_secs);
    now_sod < seconds_of_day(sunrise, utc_offset_secs)
        || now_sod > seconds_of_day(sunset, utc_offset_secs)
}

pub fn try_is_night(
    current: Option<&CurrentWeather>,
    now: DateTime<Utc>,
) -> Result<bool, DaylightError> {
    let current = current.ok_or(DaylightError::MissingSnapshot)?;
    let sunrise = current
        .sunrise
        .to_instant()
        .ok_or(DaylightError::MalformedSolarTime { field: "sunrise" })?;
    let sunset = current
        .sunset
        .to_instant()
        .ok_or(DaylightError::MalformedSolarTime { field: "sunset" })?;
    Ok(is_night_time(now, current.timezone, sunrise, sunset))
}

/// Like [`try_is_night`] but degrades to day when data is missing or bad.
#[must_use]
pub fn snapshot_is_night(current: Option<&CurrentWeather>, now: DateTime<Utc>) -> bool {
    match try_is_night(current, now) {
        Ok(is_night) => is_night,
        Err(err) => {
            log::debug!("treating as day: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::domain::weather::{Conditions, SolarTime};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 14, hour, minute, 0).unwrap()
    }

    fn snapshot(sunrise: SolarTime, sunset: SolarTime, timezone: i32) -> CurrentWeather {
        CurrentWeather {
            temperature: 20.0,
            feels_like: 20.0,
            humidity: 50.0,
            pressure: 1013.0,
            visibility: 10.0,
            wind_speed: 2.0,
            wind_direction: 0.0,
            cloudiness: 0.0,
            weather: Conditions {
                main: "Clear".to_string(),
                description: "clear sky".to_string(),
                icon: "01d".to_string(),
            },
            city: "Lisbon".to_string(),
            country: "PT".to_string(),
            sunrise,
            sunset,
            timezone,
        }
    }

    #[test]
    fn midday_is_day_and_late_evening_is_night() {
        let sunrise = at(6, 30);
        let sunset = at(19, 0);
        assert!(!is_night_time(at(12, 0), 0, sunrise, sunset));
        assert!(is_night_time(at(22, 0), 0, sunrise, sunset));
        assert!(is_night_time(at(5, 0), 0, sunrise, sunset));
    }

    #[test]
    fn sunrise_and_sunset_boundaries_are_day() {
        let sunrise = at(6, 30);
        let sunset = at(19, 0);
        assert!(!is_night_time(sunrise, 0, sunrise, sunset));
        assert!(!is_night_time(sunset, 0, sunrise, sunset));
        assert!(is_night_time(sunset + Duration::seconds(1), 0, sunrise, sunset));
    }

    #[test]
    fn offset_is_applied_to_every_instant() {
        // 09:00..21:00 UTC is 06:00..18:00 at UTC-3.
        let sunrise = at(9, 0);
        let sunset = at(21, 0);
        assert!(!is_night_time(at(20, 0), -10_800, sunrise, sunset));
        assert_eq!(seconds_of_day(at(20, 0), -10_800), 17 * 3600);
    }

    #[test]
    fn window_crossing_local_midnight_is_not_unwrapped() {
        // Sunrise 22:00 and sunset 10:00 of the shifted clock: every time of
        // day is either before sunrise or after sunset.
        let sunrise = at(22, 0);
        let sunset = at(10, 0);
        assert!(is_night_time(at(12, 0), 0, sunrise, sunset));
        assert!(is_night_time(at(23, 0), 0, sunrise, sunset));
    }

    #[test]
    fn text_and_epoch_forms_agree() {
        let now = at(20, 0);
        let as_epoch = snapshot(
            SolarTime::from_instant(at(6, 0)),
            SolarTime::from_instant(at(18, 0)),
            0,
        );
        let as_text = snapshot(
            SolarTime::Text("Tue, 14 Oct 2025 06:00:00 GMT".to_string()),
            SolarTime::Text("2025-10-14T18:00:00Z".to_string()),
            0,
        );
        assert_eq!(try_is_night(Some(&as_epoch), now), Ok(true));
        assert_eq!(try_is_night(Some(&as_text), now), Ok(true));
    }

    #[test]
    fn missing_or_malformed_data_degrades_to_day() {
        let now = at(23, 0);
        assert_eq!(try_is_night(None, now), Err(DaylightError::MissingSnapshot));
        assert!(!snapshot_is_night(None, now));

        let broken = snapshot(
            SolarTime::Text("soon".to_string()),
            SolarTime::from_instant(at(18, 0)),
            0,
        );
        assert_eq!(
            try_is_night(Some(&broken), now),
            Err(DaylightError::MalformedSolarTime { field: "sunrise" })
        );
        assert!(!snapshot_is_night(Some(&broken), now));
    }
}
