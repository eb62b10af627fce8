use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    cli::{Cli, DEFAULT_REFRESH_SECS},
    data::api::DEFAULT_API_URL,
    domain::weather::{ClassifierOptions, LightRainMode},
    ui::effects::{DEFAULT_FLASH_PROBABILITY, EffectsConfig},
};

pub const MIN_REFRESH_SECS: u64 = 10;
const DEFAULT_FPS: u8 = 30;
const REDUCED_DENSITY: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionSetting {
    Full,
    Reduced,
    Off,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub api_url: String,
    pub motion: MotionSetting,
    pub no_flash: bool,
    pub refresh_interval_secs: u64,
    pub flash_probability: f64,
    pub light_rain: LightRainMode,
    pub fps: u8,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            motion: MotionSetting::Full,
            no_flash: false,
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            flash_probability: DEFAULT_FLASH_PROBABILITY,
            light_rain: LightRainMode::Uniform,
            fps: DEFAULT_FPS,
        }
    }
}

impl RuntimeSettings {
    pub fn from_cli_defaults(cli: &Cli) -> Self {
        let motion = if cli.no_animation {
            MotionSetting::Off
        } else if cli.reduced_motion {
            MotionSetting::Reduced
        } else {
            MotionSetting::Full
        };
        let light_rain = if cli.gentle_drizzle {
            LightRainMode::Gentle
        } else {
            LightRainMode::Uniform
        };

        Self {
            api_url: cli.default_api_url(),
            motion,
            no_flash: cli.no_flash,
            refresh_interval_secs: cli.refresh_interval,
            light_rain,
            fps: cli.fps,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn refresh_interval_secs(&self) -> u64 {
        self.refresh_interval_secs.max(MIN_REFRESH_SECS)
    }

    #[must_use]
    pub fn animated(&self) -> bool {
        self.motion != MotionSetting::Off
    }

    /// Frame rate of the animation ticker; reduced motion caps it at 20.
    #[must_use]
    pub fn frame_rate(&self) -> u8 {
        let fps = self.fps.clamp(15, 60);
        if self.motion == MotionSetting::Reduced {
            fps.min(20)
        } else {
            fps
        }
    }

    #[must_use]
    pub fn effects_config(&self) -> EffectsConfig {
        EffectsConfig {
            flash_probability: self.flash_probability.clamp(0.0, 1.0),
            classifier: ClassifierOptions {
                light_rain: self.light_rain,
            },
            flash_overlay: !self.no_flash,
            density: match self.motion {
                MotionSetting::Reduced => REDUCED_DENSITY,
                MotionSetting::Full | MotionSetting::Off => 1.0,
            },
        }
    }
}

pub fn load_runtime_settings(cli: &Cli, enable_disk: bool) -> (RuntimeSettings, Option<PathBuf>) {
    if !enable_disk {
        return (RuntimeSettings::from_cli_defaults(cli), None);
    }
    match settings_path() {
        Some(path) => load_runtime_settings_from(cli, path),
        None => (RuntimeSettings::from_cli_defaults(cli), None),
    }
}

/// Saved settings from `path` with explicit CLI flags layered on top.
pub fn load_runtime_settings_from(cli: &Cli, path: PathBuf) -> (RuntimeSettings, Option<PathBuf>) {
    let mut settings = RuntimeSettings::from_cli_defaults(cli);

    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str::<RuntimeSettings>(&content) {
            Ok(saved) => settings = saved,
            Err(err) => debug!("ignoring unreadable settings file: {err}"),
        },
        Err(err) => debug!("no saved settings at {}: {err}", path.display()),
    }

    if let Some(api_url) = &cli.api_url {
        settings.api_url.clone_from(api_url);
    }
    if cli.no_animation {
        settings.motion = MotionSetting::Off;
    } else if cli.reduced_motion {
        settings.motion = MotionSetting::Reduced;
    }
    if cli.no_flash {
        settings.no_flash = true;
    }
    if cli.gentle_drizzle {
        settings.light_rain = LightRainMode::Gentle;
    }
    if cli.refresh_interval != DEFAULT_REFRESH_SECS {
        settings.refresh_interval_secs = cli.refresh_interval;
    }
    if cli.fps != DEFAULT_FPS {
        settings.fps = cli.fps;
    }

    (settings, Some(path))
}

pub fn save_runtime_settings(path: &Path, settings: &RuntimeSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("creating settings directory failed")?;
    }
    let payload =
        serde_json::to_string_pretty(settings).context("serializing settings payload failed")?;
    fs::write(path, payload).context("writing settings file failed")
}

fn settings_path() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os("SKYCAST_CONFIG_DIR") {
        return Some(PathBuf::from(base).join("settings.json"));
    }

    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("skycast")
            .join("settings.json"),
    )
}
