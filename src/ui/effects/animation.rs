use std::time::Duration;

use super::{EffectsState, FrameTime, WeatherEffects};
use crate::ui::surface::Surface;

impl WeatherEffects {
    /// Draws one frame and advances every active layer by `dt`.
    ///
    /// Layers are composited back to front: stars, clouds, snow, drizzle,
    /// rain, then the lightning bolt and flash overlay. Each layer is drawn
    /// before it moves, so a fresh population shows its spawn positions once.
    pub fn render_frame(&mut self, surface: &mut impl Surface, dt: Duration) {
        let frame = FrameTime::from_delta(dt);
        self.clock_ms += f64::from(frame.elapsed_ms);

        surface.set_global_alpha(1.0);
        surface.set_glow(0.0);
        surface.set_brightness(1.0);
        surface.clear();

        let EffectsState::Active(activation) = self.state else {
            return;
        };
        let (width, height) = (self.width, self.height);

        if activation.stars {
            self.stars.render(surface, self.clock_ms);
        }
        if activation.clouds {
            self.clouds.render(surface);
            self.clouds.tick(frame, width, height, &mut self.rng);
        }
        if activation.snow {
            self.snow.render(surface);
            self.snow.tick(frame, width, height, &mut self.rng);
        }
        if activation.drizzle {
            self.drizzle.render(surface);
            self.drizzle.tick(frame, width, height, &mut self.rng);
        }
        if activation.rain {
            self.rain.render(surface);
            self.rain.tick(frame, width, height, &mut self.rng);
        }

        self.lightning.advance(self.clock_ms);
        self.lightning
            .render(surface, self.clock_ms, self.config.flash_overlay);
    }
}
