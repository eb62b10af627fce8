use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use skycast::{
    domain::{
        daylight::{is_night_time, seconds_of_day},
        weather::{EffectActivation, WeatherCategory, classify},
    },
};

const DAY_SECS: i64 = 86_400;

fn instant(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn category() -> impl Strategy<Value = WeatherCategory> {
    prop_oneof![
        Just(WeatherCategory::Clear),
        Just(WeatherCategory::Clouds),
        Just(WeatherCategory::Rain),
        Just(WeatherCategory::Drizzle),
        Just(WeatherCategory::Thunderstorm),
        Just(WeatherCategory::Snow),
        Just(WeatherCategory::Other),
    ]
}

proptest! {
    #[test]
    fn night_matches_seconds_of_day_comparison(
        day in 0i64..20_000,
        now_sod in 0i64..DAY_SECS,
        rise_sod in 0i64..DAY_SECS,
        set_sod in 0i64..DAY_SECS,
        offset in -43_200i32..=50_400,
    ) {
        // Place each instant so its shifted clock reads the chosen second of day.
        let base = day * DAY_SECS - i64::from(offset);
        let now = instant(base + now_sod);
        let sunrise = instant(base + rise_sod);
        let sunset = instant(base + set_sod);

        prop_assert_eq!(i64::from(seconds_of_day(now, offset)), now_sod);
        let expected = now_sod < rise_sod || now_sod > set_sod;
        prop_assert_eq!(is_night_time(now, offset, sunrise, sunset), expected);
    }

    #[test]
    fn dates_do_not_matter_only_clock_time(
        now_secs in 0i64..2_000_000_000,
        rise_secs in 0i64..2_000_000_000,
        set_secs in 0i64..2_000_000_000,
        shift_days in -400i64..400,
        offset in -43_200i32..=50_400,
    ) {
        let now = instant(now_secs);
        let sunrise = instant(rise_secs);
        let sunset = instant(set_secs);
        let shifted = now + Duration::days(shift_days);
        prop_assert_eq!(
            is_night_time(now, offset, sunrise, sunset),
            is_night_time(shifted, offset, sunrise, sunset)
        );
    }

    #[test]
    fn boundaries_count_as_day(
        rise_sod in 0i64..43_200,
        len in 0i64..43_200,
        offset in -43_200i32..=50_400,
    ) {
        let base = 19_000 * DAY_SECS - i64::from(offset);
        let sunrise = instant(base + rise_sod);
        let sunset = instant(base + rise_sod + len);
        prop_assert!(!is_night_time(sunrise, offset, sunrise, sunset));
        prop_assert!(!is_night_time(sunset, offset, sunrise, sunset));
    }

    #[test]
    fn classification_is_deterministic_and_stars_track_night(
        category in category(),
        description in "[a-zA-Z ]{0,24}",
        is_night in any::<bool>(),
    ) {
        let first: EffectActivation = classify(category, &description, is_night);
        let second = classify(category, &description, is_night);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.stars, is_night);
        prop_assert_eq!(first.theme.is_night, is_night);
        prop_assert!(!(first.rain && first.drizzle));
        prop_assert_eq!(first.storm, category == WeatherCategory::Thunderstorm);
    }
}
