use std::f32::consts::TAU;

use rand::Rng;

use super::{random_between, random_upto};
use crate::ui::surface::{Paint, Path, Point, RadialGradient, Rgba, Surface};

pub(crate) const STAR_COUNT: usize = 300;
const LARGE_STAR_CHANCE: f64 = 0.1;
const HALO_SCALE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub opacity: f32,
    /// Radians per millisecond of the twinkle wave.
    pub twinkle: f32,
    pub phase: f32,
    pub large: bool,
}

impl Star {
    fn random(width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let large = rng.random_bool(LARGE_STAR_CHANCE);
        let (size, opacity, twinkle) = if large {
            (
                random_between(rng, (1.5, 4.5)),
                random_between(rng, (0.5, 1.4)).min(1.0),
                random_between(rng, (0.02, 0.05)),
            )
        } else {
            (
                random_between(rng, (0.5, 2.0)),
                random_between(rng, (0.3, 1.0)),
                random_between(rng, (0.01, 0.03)),
            )
        };
        Self {
            x: random_upto(rng, width),
            y: random_upto(rng, height),
            size,
            opacity,
            twinkle,
            phase: random_upto(rng, TAU),
            large,
        }
    }

    /// Current brightness, oscillating between 40 % and 100 % of `opacity`.
    #[must_use]
    pub fn brightness(&self, t_ms: f64) -> f32 {
        let wave = (t_ms * f64::from(self.twinkle) + f64::from(self.phase)).sin() as f32;
        self.opacity * (0.7 + 0.3 * wave)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StarField {
    stars: Vec<Star>,
}

impl StarField {
    pub fn populate(&mut self, count: usize, width: f32, height: f32, rng: &mut impl Rng) {
        self.stars.clear();
        self.stars.reserve_exact(count);
        self.stars
            .extend((0..count).map(|_| Star::random(width, height, rng)));
    }

    pub fn clear(&mut self) {
        self.stars.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    #[must_use]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn render(&self, surface: &mut impl Surface, t_ms: f64) {
        surface.set_global_alpha(1.0);
        for star in &self.stars {
            let brightness = star.brightness(t_ms).clamp(0.0, 1.0);
            let center = Point::new(star.x, star.y);
            if star.large {
                let radius = star.size * HALO_SCALE;
                let halo = RadialGradient {
                    center,
                    radius,
                    inner: Rgba::WHITE.with_alpha(brightness * 0.7),
                    outer: Rgba::TRANSPARENT,
                };
                surface.fill_path(&Path::circle(center, radius), &Paint::Radial(halo));
            }
            surface.fill_path(
                &Path::circle(center, star.size),
                &Paint::Solid(Rgba::WHITE.with_alpha(brightness)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::ui::surface::{DisplayList, DrawCommand};

    #[test]
    fn large_and_small_stars_follow_their_ranges() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut field = StarField::default();
        field.populate(STAR_COUNT, 640.0, 480.0, &mut rng);
        for star in field.stars() {
            assert!(star.opacity <= 1.0);
            assert!((0.0..TAU).contains(&star.phase));
            if star.large {
                assert!((1.5..4.5).contains(&star.size));
                assert!(star.opacity >= 0.5);
                assert!((0.02..0.05).contains(&star.twinkle));
            } else {
                assert!((0.5..2.0).contains(&star.size));
                assert!(star.opacity >= 0.3);
                assert!((0.01..0.03).contains(&star.twinkle));
            }
        }
    }

    #[test]
    fn brightness_oscillates_around_seventy_percent() {
        let star = Star {
            x: 0.0,
            y: 0.0,
            size: 1.0,
            opacity: 0.8,
            twinkle: 0.02,
            phase: 0.0,
            large: false,
        };
        assert!((star.brightness(0.0) - 0.56).abs() < 1e-6);
        let quarter = std::f64::consts::FRAC_PI_2 / 0.02;
        assert!((star.brightness(quarter) - 0.8).abs() < 1e-5);
        assert!((star.brightness(3.0 * quarter) - 0.32).abs() < 1e-5);
    }

    #[test]
    fn large_stars_get_a_halo() {
        let mut field = StarField::default();
        field.stars.push(Star {
            x: 50.0,
            y: 50.0,
            size: 2.0,
            opacity: 1.0,
            twinkle: 0.03,
            phase: 0.0,
            large: true,
        });
        let mut frame = DisplayList::new(100.0, 100.0);
        field.render(&mut frame, 0.0);
        assert_eq!(frame.commands().len(), 2);
        let DrawCommand::Fill { path, paint, .. } = &frame.commands()[0] else {
            panic!("halo should be a fill");
        };
        assert!(matches!(paint, Paint::Radial(glow) if glow.radius == 8.0));
        assert!(path.contains(Point::new(57.0, 50.0)));
    }
}
