#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{
    data::{api::DEFAULT_API_URL, location::LocationRequest},
    domain::{scenario::Scenario, weather::Coordinates},
};

pub const DEFAULT_REFRESH_SECS: u64 = 600;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ScenarioArg {
    Clear,
    Rain,
    Snow,
    Thunderstorm,
    Clouds,
    Night,
}

impl From<ScenarioArg> for Scenario {
    fn from(value: ScenarioArg) -> Self {
        match value {
            ScenarioArg::Clear => Self::Clear,
            ScenarioArg::Rain => Self::Rain,
            ScenarioArg::Snow => Self::Snow,
            ScenarioArg::Thunderstorm => Self::Thunderstorm,
            ScenarioArg::Clouds => Self::Clouds,
            ScenarioArg::Night => Self::Night,
        }
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "skycast",
    version,
    about = "Terminal weather dashboard with ambient sky effects"
)]
pub struct Cli {
    /// Weather backend base URL
    #[arg(long, env = "SKYCAST_API_URL")]
    pub api_url: Option<String>,

    /// Direct latitude (requires --lon)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Direct longitude (requires --lat)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// City name to search for
    #[arg(long)]
    pub city: Option<String>,

    /// Force a weather scenario once data arrives
    #[arg(long, value_enum)]
    pub scenario: Option<ScenarioArg>,

    /// Target FPS (15..60)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(15..=60))]
    pub fps: u8,

    /// Refresh interval in seconds
    #[arg(long, default_value_t = DEFAULT_REFRESH_SECS)]
    pub refresh_interval: u64,

    /// Disable sky animation
    #[arg(long)]
    pub no_animation: bool,

    /// Lower particle density
    #[arg(long)]
    pub reduced_motion: bool,

    /// Disable the lightning flash overlay
    #[arg(long)]
    pub no_flash: bool,

    /// Draw light rain and drizzle with the gentle drizzle layer
    #[arg(long)]
    pub gentle_drizzle: bool,

    /// Write logs to this file
    #[arg(long, env = "SKYCAST_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Directory of the offline response cache
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--lat and --lon must be provided together")
            }
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.lat?, self.lon?))
    }

    #[must_use]
    pub fn location_request(&self) -> LocationRequest {
        LocationRequest::new(self.coordinates(), self.city.as_deref())
    }

    #[must_use]
    pub fn default_api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }
}
