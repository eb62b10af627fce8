use rand::Rng;

use super::{random_between, random_upto};
use crate::ui::surface::{Paint, Path, Point, Rgba, Surface};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashStage {
    pub intensity: f32,
    pub duration_ms: u32,
}

pub const FLASH_SEQUENCE: [FlashStage; 6] = [
    FlashStage { intensity: 0.4, duration_ms: 50 },
    FlashStage { intensity: 0.0, duration_ms: 30 },
    FlashStage { intensity: 0.7, duration_ms: 80 },
    FlashStage { intensity: 0.0, duration_ms: 20 },
    FlashStage { intensity: 0.9, duration_ms: 40 },
    FlashStage { intensity: 0.0, duration_ms: 100 },
];

const BOLT_SEGMENTS: usize = 8;
const BOLT_SPREAD: f32 = 100.0;
const BOLT_JITTER: f32 = 25.0;
const BOLT_GLOW_MS: f64 = 200.0;
const BOLT_GLOW_BLUR: f32 = 10.0;
const BOLT_WIDTH: f32 = 3.0;
const BOLT_COLOR: Rgba = Rgba::new(255, 255, 255, 0.9);

fn sequence_ms() -> f64 {
    FLASH_SEQUENCE
        .iter()
        .map(|stage| f64::from(stage.duration_ms))
        .sum()
}

/// Zig-zag polyline from the top edge to the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Bolt {
    pub points: Vec<Point>,
}

impl Bolt {
    fn generate(width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let start_x = random_upto(rng, width);
        let end_x = start_x + random_between(rng, (-BOLT_SPREAD, BOLT_SPREAD));
        let mut points = Vec::with_capacity(BOLT_SEGMENTS + 1);
        points.push(Point::new(start_x, 0.0));
        for segment in 1..=BOLT_SEGMENTS {
            let t = segment as f32 / BOLT_SEGMENTS as f32;
            points.push(Point::new(
                start_x + (end_x - start_x) * t + random_between(rng, (-BOLT_JITTER, BOLT_JITTER)),
                height * t,
            ));
        }
        Self { points }
    }

    fn path(&self) -> Path {
        let mut points = self.points.iter().copied();
        let Some(first) = points.next() else {
            return Path::new();
        };
        points.fold(Path::new().move_to(first), Path::line_to)
    }
}

/// Flash sequence and bolt, timed on the animation clock in milliseconds.
#[derive(Debug, Clone, Default)]
pub struct Lightning {
    started_ms: Option<f64>,
    bolt: Option<Bolt>,
    completed: u32,
}

impl Lightning {
    /// Starts a new sequence, replacing any running one.
    pub fn strike(&mut self, now_ms: f64, width: f32, height: f32, rng: &mut impl Rng) {
        self.started_ms = Some(now_ms);
        self.bolt = Some(Bolt::generate(width, height, rng));
    }

    /// Index of the stage running at `now_ms`.
    #[must_use]
    pub fn stage(&self, now_ms: f64) -> Option<usize> {
        let mut elapsed = now_ms - self.started_ms?;
        if elapsed < 0.0 {
            return None;
        }
        for (index, stage) in FLASH_SEQUENCE.iter().enumerate() {
            let duration = f64::from(stage.duration_ms);
            if elapsed < duration {
                return Some(index);
            }
            elapsed -= duration;
        }
        None
    }

    #[must_use]
    pub fn intensity(&self, now_ms: f64) -> f32 {
        self.stage(now_ms)
            .map_or(0.0, |index| FLASH_SEQUENCE[index].intensity)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started_ms.is_some()
    }

    #[must_use]
    pub fn bolt(&self) -> Option<&Bolt> {
        self.bolt.as_ref()
    }

    /// Sequences that ran through all six stages.
    #[must_use]
    pub fn completed_flashes(&self) -> u32 {
        self.completed
    }

    /// Retires a finished sequence.
    pub fn advance(&mut self, now_ms: f64) {
        let finished = self
            .started_ms
            .is_some_and(|started| now_ms - started >= sequence_ms());
        if finished {
            self.started_ms = None;
            self.bolt = None;
            self.completed += 1;
        }
    }

    pub fn reset(&mut self) {
        self.started_ms = None;
        self.bolt = None;
    }

    pub fn render(&self, surface: &mut impl Surface, now_ms: f64, overlay: bool) {
        let Some(started) = self.started_ms else {
            return;
        };
        if let Some(bolt) = &self.bolt {
            let glow = if now_ms - started < BOLT_GLOW_MS {
                BOLT_GLOW_BLUR
            } else {
                0.0
            };
            surface.set_global_alpha(1.0);
            surface.set_glow(glow);
            surface.stroke_path(&bolt.path(), BOLT_COLOR, BOLT_WIDTH);
            surface.set_glow(0.0);
        }

        let intensity = self.intensity(now_ms);
        if overlay && intensity > 0.0 {
            let (width, height) = surface.size();
            surface.set_global_alpha(intensity);
            surface.fill_path(
                &Path::rect(0.0, 0.0, width, height),
                &Paint::Solid(Rgba::WHITE),
            );
            surface.set_global_alpha(1.0);
            surface.set_brightness(1.0 + intensity);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn sequence_steps_through_six_stages() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut lightning = Lightning::default();
        lightning.strike(1_000.0, 800.0, 600.0, &mut rng);

        let samples = [
            (1_010.0, 0.4),
            (1_060.0, 0.0),
            (1_100.0, 0.7),
            (1_165.0, 0.0),
            (1_200.0, 0.9),
            (1_250.0, 0.0),
            (1_400.0, 0.0),
        ];
        for (at, expected) in samples {
            assert_eq!(lightning.intensity(at), expected, "at {at}");
        }
        assert_eq!(lightning.stage(1_319.0), Some(5));
        assert_eq!(lightning.stage(1_320.0), None);

        lightning.advance(1_319.0);
        assert!(lightning.is_running());
        lightning.advance(1_320.0);
        assert!(!lightning.is_running());
        assert_eq!(lightning.completed_flashes(), 1);
    }

    #[test]
    fn bolt_spans_the_surface_in_eight_segments() {
        let mut rng = StdRng::seed_from_u64(32);
        for _ in 0..50 {
            let bolt = Bolt::generate(800.0, 600.0, &mut rng);
            assert_eq!(bolt.points.len(), 9);
            let start = bolt.points[0];
            let end = bolt.points[8];
            assert_eq!(start.y, 0.0);
            assert_eq!(end.y, 600.0);
            assert!((end.x - start.x).abs() <= BOLT_SPREAD + BOLT_JITTER);
        }
    }

    #[test]
    fn bolt_glows_only_at_first() {
        let mut rng = StdRng::seed_from_u64(33);
        let mut lightning = Lightning::default();
        lightning.strike(0.0, 800.0, 600.0, &mut rng);

        let mut early = crate::ui::surface::DisplayList::new(800.0, 600.0);
        lightning.render(&mut early, 150.0, false);
        let mut late = crate::ui::surface::DisplayList::new(800.0, 600.0);
        lightning.render(&mut late, 250.0, false);

        let glow = |list: &crate::ui::surface::DisplayList| match list.commands() {
            [crate::ui::surface::DrawCommand::Stroke { glow, .. }] => *glow,
            other => panic!("unexpected commands {other:?}"),
        };
        assert_eq!(glow(&early), BOLT_GLOW_BLUR);
        assert_eq!(glow(&late), 0.0);
    }

    #[test]
    fn reset_drops_a_running_sequence() {
        let mut rng = StdRng::seed_from_u64(34);
        let mut lightning = Lightning::default();
        lightning.strike(0.0, 800.0, 600.0, &mut rng);
        lightning.reset();
        assert_eq!(lightning.intensity(10.0), 0.0);
        assert!(lightning.bolt().is_none());
        assert_eq!(lightning.completed_flashes(), 0);
    }
}
