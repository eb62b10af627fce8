//! Ambient weather effects: particle layers plus the controller that turns a
//! weather report into an activation set and keeps the layers in step.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::domain::{
    daylight::snapshot_is_night,
    weather::{
        ClassifierOptions, CurrentWeather, EffectActivation, ThemeKey, WeatherCategory,
        classify_with,
    },
};

mod animation;
mod clouds;
mod lightning;
mod rain;
mod snow;
mod stars;


pub use clouds::{Cloud, CloudField, CloudShape};
pub use lightning::{Bolt, FLASH_SEQUENCE, FlashStage, Lightning};
pub use rain::{RainDrop, RainKind, RainSystem, Splash};
pub use snow::{SnowField, Snowflake};
pub use stars::{Star, StarField};

pub const DEFAULT_FLASH_PROBABILITY: f64 = 0.15;
const LIGHTNING_INTERVAL_MS: std::ops::Range<u64> = 2_000..5_000;

/// Time handed to one frame: `step` is the number of 60 Hz frames the
/// motion constants are scaled by, `elapsed_ms` is the clamped wall time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub step: f32,
    pub elapsed_ms: f32,
}

impl FrameTime {
    #[must_use]
    pub fn from_delta(dt: Duration) -> Self {
        let secs = dt.as_secs_f32().clamp(0.0, 0.25);
        Self {
            step: secs * 60.0,
            elapsed_ms: secs * 1000.0,
        }
    }
}

/// Uniform sample in `[0, max)`; zero for an empty range so a zero-sized
/// surface never panics the sampler.
pub(crate) fn random_upto(rng: &mut impl Rng, max: f32) -> f32 {
    if max > 0.0 {
        rng.random_range(0.0..max)
    } else {
        0.0
    }
}

pub(crate) fn random_between(rng: &mut impl Rng, (low, high): (f32, f32)) -> f32 {
    low + random_upto(rng, high - low)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectsConfig {
    pub flash_probability: f64,
    pub classifier: ClassifierOptions,
    /// White overlay and brightness boost while a flash sequence runs.
    pub flash_overlay: bool,
    /// Multiplier on every population size; below 1 for reduced motion.
    pub density: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            flash_probability: DEFAULT_FLASH_PROBABILITY,
            classifier: ClassifierOptions::default(),
            flash_overlay: true,
            density: 1.0,
        }
    }
}

impl EffectsConfig {
    pub(crate) fn scaled(&self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        ((count as f32 * self.density.clamp(0.0, 1.0)).round() as usize).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectsState {
    #[default]
    Idle,
    Active(EffectActivation),
}

/// What the caller must do with its lightning timer after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StormTransition {
    Started(Duration),
    Stopped,
    Unchanged,
}

#[derive(Debug)]
pub struct WeatherEffects {
    config: EffectsConfig,
    rng: StdRng,
    width: f32,
    height: f32,
    state: EffectsState,
    rain: RainSystem,
    drizzle: RainSystem,
    snow: SnowField,
    stars: StarField,
    clouds: CloudField,
    lightning: Lightning,
    clock_ms: f64,
}

impl WeatherEffects {
    #[must_use]
    pub fn new(config: EffectsConfig, width: f32, height: f32) -> Self {
        Self::with_rng(config, width, height, StdRng::from_os_rng())
    }

    #[must_use]
    pub fn with_seed(config: EffectsConfig, width: f32, height: f32, seed: u64) -> Self {
        Self::with_rng(config, width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: EffectsConfig, width: f32, height: f32, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            width: width.max(0.0),
            height: height.max(0.0),
            state: EffectsState::Idle,
            rain: RainSystem::default(),
            drizzle: RainSystem::default(),
            snow: SnowField::default(),
            stars: StarField::default(),
            clouds: CloudField::default(),
            lightning: Lightning::default(),
            clock_ms: 0.0,
        }
    }

    /// New bounds apply to future spawns and recycling; live particles stay put.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    #[must_use]
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn set_config(&mut self, config: EffectsConfig) {
        self.config = config;
    }

    #[must_use]
    pub fn config(&self) -> EffectsConfig {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> EffectsState {
        self.state
    }

    #[must_use]
    pub fn activation(&self) -> Option<EffectActivation> {
        match self.state {
            EffectsState::Idle => None,
            EffectsState::Active(activation) => Some(activation),
        }
    }

    #[must_use]
    pub fn theme(&self) -> ThemeKey {
        self.activation()
            .map(|activation| activation.theme)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn storm_active(&self) -> bool {
        self.activation().is_some_and(|activation| activation.storm)
    }

    /// Recomputes the activation set from a snapshot. `None` returns to idle.
    pub fn apply_snapshot(
        &mut self,
        current: Option<&CurrentWeather>,
        now: DateTime<Utc>,
    ) -> StormTransition {
        let Some(current) = current else {
            return self.go_idle();
        };
        let is_night = snapshot_is_night(Some(current), now);
        self.apply_conditions(current.category(), &current.weather.description, is_night)
    }

    pub fn apply_conditions(
        &mut self,
        category: WeatherCategory,
        description: &str,
        is_night: bool,
    ) -> StormTransition {
        let next = classify_with(category, description, is_night, self.config.classifier);
        let previous = self.activation();
        if previous.map(|activation| activation.theme) != Some(next.theme) {
            log::info!(
                "weather effects: theme {} with [{}]",
                next.theme,
                next.active_labels().join(", ")
            );
        }

        self.populate(previous.unwrap_or_default(), next);
        self.state = EffectsState::Active(next);
        self.storm_transition(previous.is_some_and(|activation| activation.storm), next.storm)
    }

    fn go_idle(&mut self) -> StormTransition {
        let was_storm = self.storm_active();
        if self.state != EffectsState::Idle {
            log::info!("weather effects: idle");
        }
        self.state = EffectsState::Idle;
        self.stars.clear();
        self.storm_transition(was_storm, false)
    }

    fn populate(&mut self, previous: EffectActivation, next: EffectActivation) {
        let (width, height) = (self.width, self.height);
        let is_night = next.theme.is_night;
        let night_changed = previous.theme.is_night != is_night;

        if next.rain
            && (!previous.rain || previous.rain_profile != next.rain_profile || night_changed)
        {
            let kind = RainKind::for_profile(next.rain_profile);
            let count = self.config.scaled(kind.count());
            self.rain
                .activate(kind, count, width, height, is_night, &mut self.rng);
        }
        if next.drizzle && (!previous.drizzle || night_changed) {
            let count = self.config.scaled(RainKind::Drizzle.count());
            self.drizzle
                .activate(RainKind::Drizzle, count, width, height, is_night, &mut self.rng);
        }
        if next.snow && !previous.snow {
            let count = self.config.scaled(snow::FLAKE_COUNT);
            self.snow.activate(count, width, height, &mut self.rng);
        }
        let cover_changed = previous.cloud_cover != next.cloud_cover || night_changed;
        if next.clouds && (!previous.clouds || cover_changed) {
            if let Some(cover) = next.cloud_cover {
                let count = self.config.scaled(clouds::cover_params(cover).count);
                self.clouds
                    .activate(cover, count, is_night, width, height, &mut self.rng);
            }
        }

        if !next.stars {
            self.stars.clear();
        } else if self.stars.is_empty() {
            let count = self.config.scaled(stars::STAR_COUNT);
            self.stars.populate(count, width, height, &mut self.rng);
        }
    }

    fn storm_transition(&mut self, was_storm: bool, is_storm: bool) -> StormTransition {
        match (was_storm, is_storm) {
            (false, true) => {
                let interval = self.lightning_interval();
                log::info!("storm started, lightning every {} ms", interval.as_millis());
                StormTransition::Started(interval)
            }
            (true, false) => {
                self.lightning.reset();
                log::info!("storm stopped");
                StormTransition::Stopped
            }
            _ => StormTransition::Unchanged,
        }
    }

    /// Fresh lightning timer period, uniform in 2-5 s.
    pub fn lightning_interval(&mut self) -> Duration {
        Duration::from_millis(self.rng.random_range(LIGHTNING_INTERVAL_MS))
    }

    /// One lightning timer tick. Returns whether a flash sequence started.
    pub fn on_lightning_tick(&mut self) -> bool {
        if !self.storm_active() {
            return false;
        }
        let probability = self.config.flash_probability.clamp(0.0, 1.0);
        if !self.rng.random_bool(probability) {
            return false;
        }
        self.lightning
            .strike(self.clock_ms, self.width, self.height, &mut self.rng);
        log::debug!("lightning flash at {:.0} ms", self.clock_ms);
        true
    }

    #[must_use]
    pub fn flash_intensity(&self) -> f32 {
        self.lightning.intensity(self.clock_ms)
    }

    #[must_use]
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    #[must_use]
    pub fn rain(&self) -> &RainSystem {
        &self.rain
    }

    #[must_use]
    pub fn drizzle(&self) -> &RainSystem {
        &self.drizzle
    }

    #[must_use]
    pub fn snow(&self) -> &SnowField {
        &self.snow
    }

    #[must_use]
    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    #[must_use]
    pub fn clouds(&self) -> &CloudField {
        &self.clouds
    }

    #[must_use]
    pub fn lightning(&self) -> &Lightning {
        &self.lightning
    }
}
