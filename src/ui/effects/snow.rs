use rand::Rng;

use super::{FrameTime, random_between, random_upto};
use crate::ui::surface::{Paint, Path, Point, Rgba, Surface};

pub(crate) const FLAKE_COUNT: usize = 50;
const FLAKE_COLOR: Rgba = Rgba::new(255, 255, 255, 0.8);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snowflake {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub size: f32,
    pub opacity: f32,
    pub drift: f32,
}

#[derive(Debug, Clone, Default)]
pub struct SnowField {
    flakes: Vec<Snowflake>,
}

impl SnowField {
    pub fn activate(&mut self, count: usize, width: f32, height: f32, rng: &mut impl Rng) {
        self.flakes.clear();
        self.flakes.reserve_exact(count);
        for _ in 0..count {
            self.flakes.push(Snowflake {
                x: random_upto(rng, width),
                y: random_upto(rng, height) - height,
                speed: random_between(rng, (1.0, 4.0)),
                size: random_between(rng, (2.0, 6.0)),
                opacity: random_between(rng, (0.2, 1.0)),
                drift: random_between(rng, (-1.0, 1.0)),
            });
        }
    }

    #[must_use]
    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    pub fn tick(&mut self, frame: FrameTime, width: f32, height: f32, rng: &mut impl Rng) {
        for flake in &mut self.flakes {
            flake.y += flake.speed * frame.step;
            flake.x += flake.drift * frame.step;
            if flake.y > height {
                flake.y = -flake.size;
                flake.x = random_upto(rng, width);
            }
            if flake.x > width || flake.x < 0.0 {
                flake.x = random_upto(rng, width);
            }
        }
    }

    pub fn render(&self, surface: &mut impl Surface) {
        for flake in &self.flakes {
            surface.set_global_alpha(flake.opacity);
            surface.fill_path(
                &Path::circle(Point::new(flake.x, flake.y), flake.size),
                &Paint::Solid(FLAKE_COLOR),
            );
        }
        surface.set_global_alpha(1.0);
    }
}
