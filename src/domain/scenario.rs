use chrono::{DateTime, Duration, Utc};

use crate::domain::weather::{Conditions, CurrentWeather, SolarTime};

/// Forced weather used to check the effects without live data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Clear,
    Rain,
    Snow,
    Thunderstorm,
    Clouds,
    Night,
}

impl Scenario {
    pub const ALL: [Scenario; 6] = [
        Scenario::Clear,
        Scenario::Rain,
        Scenario::Snow,
        Scenario::Thunderstorm,
        Scenario::Clouds,
        Scenario::Night,
    ];

    /// Number keys `1`..`6` in the order of [`Scenario::ALL`].
    #[must_use]
    pub fn from_key(key: char) -> Option<Self> {
        let index = key.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(index as usize).copied()
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Thunderstorm => "thunderstorm",
            Self::Clouds => "clouds",
            Self::Night => "night",
        }
    }

    fn conditions(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::Clear => ("Clear", "Clear sky", "01d"),
            Self::Rain => ("Rain", "Rain", "10d"),
            Self::Snow => ("Snow", "Snow", "13d"),
            Self::Thunderstorm => ("Thunderstorm", "Thunderstorm", "11d"),
            Self::Clouds => ("Clouds", "Cloudy", "03d"),
            Self::Night => ("Clear", "Clear night", "01n"),
        }
    }

    /// Copy of `base` with the forced condition. `Night` also moves sunrise
    /// 12 hours and sunset 6 hours before `now`, which reads as night at any
    /// time of day.
    #[must_use]
    pub fn apply(self, base: &CurrentWeather, now: DateTime<Utc>) -> CurrentWeather {
        let (main, description, icon) = self.conditions();
        let mut forced = base.clone();
        forced.weather = Conditions {
            main: main.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
        };
        if self == Self::Night {
            forced.sunrise = SolarTime::from_instant(now - Duration::hours(12));
            forced.sunset = SolarTime::from_instant(now - Duration::hours(6));
        }
        forced
    }
}
