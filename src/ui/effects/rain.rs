use rand::Rng;

use super::{FrameTime, random_between, random_upto};
use crate::{
    domain::weather::RainProfile,
    ui::surface::{Paint, Path, Point, Rgba, Surface},
};

const SPLASH_CHANCE: f64 = 0.5;
const SPLASH_DROPLET_CHANCE: f64 = 0.3;
const SPLASH_LIFETIME_MS: f32 = 120.0;
const SPLASH_SLOTS: usize = 48;

const RAIN_COLOR: Rgba = Rgba::new(174, 194, 224, 0.8);
const NIGHT_RAIN_COLOR: Rgba = Rgba::new(174, 194, 224, 0.7);
const NIGHT_STORM_COLOR: Rgba = Rgba::new(200, 200, 255, 0.8);
const DRIZZLE_COLOR: Rgba = Rgba::new(174, 194, 224, 0.6);
const NIGHT_DRIZZLE_COLOR: Rgba = Rgba::new(174, 194, 224, 0.5);
const SPLASH_COLOR: Rgba = Rgba::new(255, 255, 255, 0.5);
const NIGHT_SPLASH_COLOR: Rgba = Rgba::new(200, 200, 255, 0.4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainKind {
    Storm,
    Steady,
    Drizzle,
}

struct RainParams {
    count: usize,
    speed_factor: f32,
    speed: (f32, f32),
    length: (f32, f32),
    max_angle_deg: f32,
    day_opacity: (f32, f32),
    night_opacity: (f32, f32),
    drift_base: f32,
    drift_per_degree: f32,
    streak_offset: f32,
    line_width: f32,
    splashes: bool,
}

impl RainKind {
    /// Storm keeps its own profile; light and steady rain share the steady one.
    #[must_use]
    pub fn for_profile(profile: Option<RainProfile>) -> Self {
        match profile {
            Some(RainProfile::Storm) => Self::Storm,
            _ => Self::Steady,
        }
    }

    #[must_use]
    pub fn count(self) -> usize {
        self.params().count
    }

    fn params(self) -> RainParams {
        let rain = RainParams {
            count: 150,
            speed_factor: 1.0,
            speed: (15.0, 30.0),
            length: (15.0, 30.0),
            max_angle_deg: 5.0,
            day_opacity: (0.3, 1.0),
            night_opacity: (0.4, 1.0),
            drift_base: 1.0,
            drift_per_degree: 0.1,
            streak_offset: 3.0,
            line_width: 1.5,
            splashes: true,
        };
        match self {
            Self::Steady => rain,
            Self::Storm => RainParams {
                count: 200,
                speed_factor: 1.5,
                line_width: 2.0,
                ..rain
            },
            Self::Drizzle => RainParams {
                count: 200,
                speed_factor: 0.7,
                speed: (8.0, 18.0),
                length: (5.0, 13.0),
                max_angle_deg: 4.0,
                day_opacity: (0.2, 0.9),
                night_opacity: (0.3, 0.8),
                drift_base: 0.5,
                drift_per_degree: 0.05,
                streak_offset: 2.0,
                line_width: 1.0,
                splashes: false,
            },
        }
    }

    fn color(self, is_night: bool) -> Rgba {
        match (self, is_night) {
            (Self::Storm, true) => NIGHT_STORM_COLOR,
            (Self::Steady, true) => NIGHT_RAIN_COLOR,
            (Self::Storm | Self::Steady, false) => RAIN_COLOR,
            (Self::Drizzle, true) => NIGHT_DRIZZLE_COLOR,
            (Self::Drizzle, false) => DRIZZLE_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainDrop {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub length: f32,
    pub opacity: f32,
    /// Degrees off vertical.
    pub angle: f32,
}

impl RainDrop {
    /// Streak end point; the streak leans left and spans about two lengths.
    #[must_use]
    pub fn tail(&self, streak_offset: f32) -> Point {
        let angle = self.angle.to_radians();
        Point::new(
            self.x - streak_offset + angle.sin() * self.length,
            self.y + self.length + angle.cos() * self.length,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Splash {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub droplets: [(f32, f32, f32); 3],
    pub droplet_count: u8,
    pub age_ms: f32,
    pub live: bool,
}

#[derive(Debug, Clone)]
pub struct RainSystem {
    kind: RainKind,
    is_night: bool,
    drops: Vec<RainDrop>,
    splashes: Vec<Splash>,
}

impl Default for RainSystem {
    fn default() -> Self {
        Self {
            kind: RainKind::Steady,
            is_night: false,
            drops: Vec::new(),
            splashes: vec![Splash::default(); SPLASH_SLOTS],
        }
    }
}

impl RainSystem {
    pub fn activate(
        &mut self,
        kind: RainKind,
        count: usize,
        width: f32,
        height: f32,
        is_night: bool,
        rng: &mut impl Rng,
    ) {
        let params = kind.params();
        self.kind = kind;
        self.is_night = is_night;
        self.drops.clear();
        self.drops.reserve_exact(count);
        let opacity = if is_night {
            params.night_opacity
        } else {
            params.day_opacity
        };
        for _ in 0..count {
            self.drops.push(RainDrop {
                x: random_upto(rng, width),
                y: random_upto(rng, height) - height,
                speed: random_between(rng, params.speed) * params.speed_factor,
                length: random_between(rng, params.length),
                opacity: random_between(rng, opacity),
                angle: random_between(rng, (-params.max_angle_deg, params.max_angle_deg)),
            });
        }
        self.splashes.fill(Splash::default());
    }

    #[must_use]
    pub fn kind(&self) -> RainKind {
        self.kind
    }

    #[must_use]
    pub fn is_night(&self) -> bool {
        self.is_night
    }

    #[must_use]
    pub fn drops(&self) -> &[RainDrop] {
        &self.drops
    }

    pub fn live_splashes(&self) -> impl Iterator<Item = &Splash> {
        self.splashes.iter().filter(|splash| splash.live)
    }

    pub fn tick(&mut self, frame: FrameTime, width: f32, height: f32, rng: &mut impl Rng) {
        let params = self.kind.params();
        for splash in self.splashes.iter_mut().filter(|splash| splash.live) {
            splash.age_ms += frame.elapsed_ms;
            splash.live = splash.age_ms < SPLASH_LIFETIME_MS;
        }

        for index in 0..self.drops.len() {
            let drop = &mut self.drops[index];
            drop.y += drop.speed * frame.step;
            drop.x -= (params.drift_base + drop.angle * params.drift_per_degree) * frame.step;
            if drop.y <= height {
                continue;
            }
            let impact_x = drop.x;
            drop.y = -drop.length;
            drop.x = random_upto(rng, width);
            drop.angle = random_between(rng, (-params.max_angle_deg, params.max_angle_deg));
            if params.splashes && rng.random_bool(SPLASH_CHANCE) {
                self.emit_splash(impact_x, height, rng);
            }
        }
    }

    fn emit_splash(&mut self, x: f32, y: f32, rng: &mut impl Rng) {
        let Some(slot) = self
            .splashes
            .iter_mut()
            .max_by(|a, b| slot_rank(a).total_cmp(&slot_rank(b)))
        else {
            return;
        };
        let mut splash = Splash {
            x,
            y,
            size: random_between(rng, (1.5, 4.5)),
            live: true,
            ..Splash::default()
        };
        if rng.random_bool(SPLASH_DROPLET_CHANCE) {
            for droplet in &mut splash.droplets {
                let angle = random_upto(rng, std::f32::consts::TAU);
                let distance = random_between(rng, (2.0, 7.0));
                *droplet = (
                    angle.cos() * distance,
                    angle.sin() * distance,
                    random_between(rng, (0.5, 2.0)),
                );
            }
            splash.droplet_count = 3;
        }
        *slot = splash;
    }

    pub fn render(&self, surface: &mut impl Surface) {
        let params = self.kind.params();
        let color = self.kind.color(self.is_night);
        for drop in &self.drops {
            surface.set_global_alpha(drop.opacity);
            let streak = Path::line(
                Point::new(drop.x, drop.y),
                drop.tail(params.streak_offset),
            );
            surface.stroke_path(&streak, color, params.line_width);
        }

        let (main, secondary) = if self.is_night {
            (NIGHT_SPLASH_COLOR, NIGHT_SPLASH_COLOR.with_alpha(0.3))
        } else {
            (SPLASH_COLOR, SPLASH_COLOR.with_alpha(0.4))
        };
        for splash in self.live_splashes() {
            surface.set_global_alpha(1.0 - splash.age_ms / SPLASH_LIFETIME_MS);
            surface.fill_path(
                &Path::circle(Point::new(splash.x, splash.y), splash.size),
                &Paint::Solid(main),
            );
            for &(dx, dy, radius) in &splash.droplets[..usize::from(splash.droplet_count)] {
                surface.fill_path(
                    &Path::circle(Point::new(splash.x + dx, splash.y + dy), radius),
                    &Paint::Solid(secondary),
                );
            }
        }
        surface.set_global_alpha(1.0);
    }
}

/// Free slots first, then the oldest live splash.
fn slot_rank(splash: &Splash) -> f32 {
    if splash.live {
        splash.age_ms
    } else {
        f32::INFINITY
    }
}
