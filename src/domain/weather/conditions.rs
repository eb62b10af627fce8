use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Other,
}

impl WeatherCategory {
    /// Parses the provider's `weather.main` field, ignoring case.
    #[must_use]
    pub fn from_main(main: &str) -> Self {
        match main.trim().to_ascii_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            "drizzle" => Self::Drizzle,
            "thunderstorm" => Self::Thunderstorm,
            "snow" => Self::Snow,
            _ => Self::Other,
        }
    }
}

/// Intensity of the falling-rain layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainProfile {
    Storm,
    Steady,
    Light,
}

/// Density and opacity class of the cloud layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudCover {
    Overcast,
    Rainy,
    Stormy,
    Light,
}

/// How light rain and drizzle are drawn.
///
/// `Uniform` keeps them on the regular rain layer with the steady profile, so
/// light and heavy rain look the same. `Gentle` moves them to the drizzle
/// layer, which falls slower with shorter streaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightRainMode {
    #[default]
    Uniform,
    Gentle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassifierOptions {
    pub light_rain: LightRainMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeCondition {
    Clear,
    Cloudy,
    Rainy,
    Drizzle,
    Stormy,
    Snow,
}

impl ThemeCondition {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Drizzle => "drizzle",
            Self::Stormy => "stormy",
            Self::Snow => "snow",
        }
    }
}

/// Background styling key, rendered as `{condition}-{day|night}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeKey {
    pub condition: ThemeCondition,
    pub is_night: bool,
}

impl Default for ThemeKey {
    fn default() -> Self {
        Self {
            condition: ThemeCondition::Clear,
            is_night: false,
        }
    }
}

impl fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time_of_day = if self.is_night { "night" } else { "day" };
        write!(f, "{}-{}", self.condition.as_str(), time_of_day)
    }
}

/// Independent effect flags derived from one report. Always rebuilt whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectActivation {
    pub rain: bool,
    pub drizzle: bool,
    pub snow: bool,
    pub storm: bool,
    pub stars: bool,
    pub clouds: bool,
    pub rain_profile: Option<RainProfile>,
    pub cloud_cover: Option<CloudCover>,
    pub theme: ThemeKey,
}

impl EffectActivation {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.rain || self.drizzle || self.snow || self.storm || self.stars || self.clouds)
    }

    #[must_use]
    pub fn active_labels(&self) -> Vec<&'static str> {
        [
            (self.stars, "stars"),
            (self.clouds, "clouds"),
            (self.snow, "snow"),
            (self.drizzle, "drizzle"),
            (self.rain, "rain"),
            (self.storm, "storm"),
        ]
        .into_iter()
        .filter_map(|(on, label)| on.then_some(label))
        .collect()
    }
}

#[must_use]
pub fn classify(category: WeatherCategory, description: &str, is_night: bool) -> EffectActivation {
    classify_with(category, description, is_night, ClassifierOptions::default())
}

#[must_use]
pub fn classify_with(
    category: WeatherCategory,
    description: &str,
    is_night: bool,
    options: ClassifierOptions,
) -> EffectActivation {
    let light = mentions_light_rain(description);
    let mut activation = EffectActivation {
        theme: ThemeKey {
            condition: theme_condition(category, light),
            is_night,
        },
        ..EffectActivation::default()
    };

    match category {
        WeatherCategory::Rain | WeatherCategory::Drizzle => {
            let profile = if category == WeatherCategory::Drizzle || light {
                RainProfile::Light
            } else {
                RainProfile::Steady
            };
            set_precipitation(&mut activation, profile, options.light_rain);
            activation.clouds = true;
            activation.cloud_cover = Some(CloudCover::Rainy);
        }
        WeatherCategory::Thunderstorm => {
            set_precipitation(&mut activation, RainProfile::Storm, options.light_rain);
            activation.storm = true;
            activation.clouds = true;
            activation.cloud_cover = Some(CloudCover::Stormy);
        }
        WeatherCategory::Snow => {
            activation.snow = true;
            activation.clouds = true;
            activation.cloud_cover = Some(CloudCover::Light);
        }
        WeatherCategory::Clouds => {
            activation.clouds = true;
            activation.cloud_cover = Some(CloudCover::Overcast);
        }
        WeatherCategory::Clear | WeatherCategory::Other => {}
    }

    // Night always shows stars, day never does, whatever the category.
    activation.stars = is_night;
    activation
}

fn set_precipitation(activation: &mut EffectActivation, profile: RainProfile, mode: LightRainMode) {
    activation.rain_profile = Some(profile);
    if profile == RainProfile::Light && mode == LightRainMode::Gentle {
        activation.drizzle = true;
    } else {
        activation.rain = true;
    }
}

fn mentions_light_rain(description: &str) -> bool {
    let description = description.to_lowercase();
    description.contains("light") || description.contains("drizzle")
}

fn theme_condition(category: WeatherCategory, light: bool) -> ThemeCondition {
    match category {
        WeatherCategory::Clear | WeatherCategory::Other => ThemeCondition::Clear,
        WeatherCategory::Clouds => ThemeCondition::Cloudy,
        WeatherCategory::Rain if light => ThemeCondition::Drizzle,
        WeatherCategory::Rain => ThemeCondition::Rainy,
        WeatherCategory::Drizzle => ThemeCondition::Drizzle,
        WeatherCategory::Thunderstorm => ThemeCondition::Stormy,
        WeatherCategory::Snow => ThemeCondition::Snow,
    }
}
