use rand::Rng;

use super::{FrameTime, random_between, random_upto};
use crate::{
    domain::weather::CloudCover,
    ui::surface::{Paint, Path, Point, Rgba, Surface},
};

const CLOUD_COLOR: Rgba = Rgba::new(255, 255, 255, 0.8);
const NIGHT_OPACITY_FACTOR: f32 = 0.7;
const SKY_BAND: f32 = 0.7;
const EDGE_MARGIN: f32 = 100.0;

/// Outline segments in units of the cloud size, relative to its centre.
type Segment = [(f32, f32); 3];

const ROUNDED_START: (f32, f32) = (-0.5, 0.0);
const ROUNDED: [Segment; 5] = [
    [(-0.56, -0.24), (-0.32, -0.36), (-0.2, -0.26)],
    [(-0.06, -0.44), (0.18, -0.42), (0.28, -0.26)],
    [(0.44, -0.24), (0.6, -0.1), (0.5, 0.0)],
    [(0.54, 0.18), (0.24, 0.26), (0.0, 0.2)],
    [(-0.24, 0.26), (-0.54, 0.16), (-0.5, 0.0)],
];

const BILLOWED_START: (f32, f32) = (-0.6, 0.0);
const BILLOWED: [Segment; 6] = [
    [(-0.72, -0.22), (-0.5, -0.48), (-0.24, -0.38)],
    [(-0.04, -0.58), (0.22, -0.44), (0.42, -0.28)],
    [(0.62, -0.22), (0.64, 0.08), (0.52, 0.18)],
    [(0.38, 0.38), (0.12, 0.42), (0.0, 0.3)],
    [(-0.12, 0.42), (-0.34, 0.36), (-0.48, 0.2)],
    [(-0.62, 0.12), (-0.66, -0.04), (-0.6, 0.0)],
];

/// `(dx, radius)` puffs laid along the horizontal axis.
const ELONGATED: [(f32, f32); 5] = [
    (0.0, 0.3),
    (0.5, 0.4),
    (-0.5, 0.4),
    (0.8, 0.3),
    (-0.8, 0.3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudShape {
    Rounded,
    Billowed,
    Elongated,
}

impl CloudShape {
    const ALL: [CloudShape; 3] = [Self::Rounded, Self::Billowed, Self::Elongated];

    #[must_use]
    pub fn outline(self, x: f32, y: f32, size: f32) -> Path {
        let at = |(dx, dy): (f32, f32)| Point::new(x + dx * size, y + dy * size);
        let bezier = |start: (f32, f32), segments: &[Segment]| {
            segments
                .iter()
                .fold(Path::new().move_to(at(start)), |path, [c1, c2, to]| {
                    path.cubic_to(at(*c1), at(*c2), at(*to))
                })
                .close()
        };
        match self {
            Self::Rounded => bezier(ROUNDED_START, &ROUNDED),
            Self::Billowed => bezier(BILLOWED_START, &BILLOWED),
            Self::Elongated => ELONGATED.iter().fold(Path::new(), |path, (dx, radius)| {
                path.arc(Point::new(x + dx * size, y), radius * size)
            }),
        }
    }
}

pub(crate) struct CoverParams {
    pub count: usize,
    pub base_opacity: f32,
    pub opacity_spread: f32,
}

pub(crate) fn cover_params(cover: CloudCover) -> CoverParams {
    let (count, base_opacity, opacity_spread) = match cover {
        CloudCover::Overcast => (25, 0.4, 0.3),
        CloudCover::Rainy => (20, 0.5, 0.2),
        CloudCover::Stormy => (30, 0.6, 0.2),
        CloudCover::Light => (15, 0.3, 0.2),
    };
    CoverParams {
        count,
        base_opacity,
        opacity_spread,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub size: f32,
    pub opacity: f32,
    pub shape: CloudShape,
}

#[derive(Debug, Clone, Default)]
pub struct CloudField {
    cover: Option<CloudCover>,
    clouds: Vec<Cloud>,
}

impl CloudField {
    pub fn activate(
        &mut self,
        cover: CloudCover,
        count: usize,
        is_night: bool,
        width: f32,
        height: f32,
        rng: &mut impl Rng,
    ) {
        let params = cover_params(cover);
        let base = if is_night {
            params.base_opacity * NIGHT_OPACITY_FACTOR
        } else {
            params.base_opacity
        };
        self.cover = Some(cover);
        self.clouds.clear();
        self.clouds.reserve_exact(count);
        for _ in 0..count {
            self.clouds.push(Cloud {
                x: random_upto(rng, width + 2.0 * EDGE_MARGIN) - EDGE_MARGIN,
                y: random_upto(rng, height * SKY_BAND),
                speed: random_between(rng, (0.1, 0.4)),
                size: random_between(rng, (60.0, 180.0)),
                opacity: base + random_upto(rng, params.opacity_spread),
                shape: CloudShape::ALL[rng.random_range(0..CloudShape::ALL.len())],
            });
        }
    }

    #[must_use]
    pub fn cover(&self) -> Option<CloudCover> {
        self.cover
    }

    #[must_use]
    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn tick(&mut self, frame: FrameTime, width: f32, height: f32, rng: &mut impl Rng) {
        for cloud in &mut self.clouds {
            cloud.x += cloud.speed * frame.step;
            if cloud.x > width + cloud.size {
                cloud.x = -2.0 * cloud.size;
                cloud.y = random_upto(rng, height * SKY_BAND);
                cloud.opacity = random_between(rng, (0.2, 0.5));
            }
        }
    }

    pub fn render(&self, surface: &mut impl Surface) {
        for cloud in &self.clouds {
            surface.set_global_alpha(cloud.opacity);
            surface.fill_path(
                &cloud.shape.outline(cloud.x, cloud.y, cloud.size),
                &Paint::Solid(CLOUD_COLOR),
            );
        }
        surface.set_global_alpha(1.0);
    }
}
