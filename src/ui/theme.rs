use ratatui::style::Color;

use crate::domain::weather::{ThemeCondition, ThemeKey};

pub type Rgb = (u8, u8, u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Xterm256,
    Basic16,
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Unquantised sky colour the effect layers are blended over.
    pub sky: Rgb,
    pub background: Color,
    pub surface: Color,
    pub popup_surface: Color,
    pub accent: Color,
    pub text: Color,
    pub muted_text: Color,
    pub border: Color,
    pub popup_border: Color,
    pub danger: Color,
    pub temp_cold: Color,
    pub temp_mild: Color,
    pub temp_warm: Color,
    pub temp_hot: Color,
}

pub fn detect_color_capability() -> ColorCapability {
    detect_color_capability_from(
        std::env::var("TERM").ok().as_deref(),
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("NO_COLOR").ok().as_deref(),
    )
}

pub(crate) fn detect_color_capability_from(
    term: Option<&str>,
    colorterm: Option<&str>,
    no_color: Option<&str>,
) -> ColorCapability {
    let term = term.unwrap_or_default().to_lowercase();
    let colorterm = colorterm.unwrap_or_default().to_lowercase();
    if no_color.is_some_and(|value| !value.is_empty()) || term == "dumb" {
        return ColorCapability::Basic16;
    }
    if colorterm.contains("truecolor") || colorterm.contains("24bit") || term.ends_with("direct")
    {
        return ColorCapability::TrueColor;
    }
    if term.contains("256color") {
        ColorCapability::Xterm256
    } else {
        ColorCapability::Basic16
    }
}

/// `(sky, accent)` seeds per theme key.
fn seeds(key: ThemeKey) -> (Rgb, Rgb) {
    match (key.condition, key.is_night) {
        (ThemeCondition::Clear, false) => ((38, 112, 181), (255, 214, 112)),
        (ThemeCondition::Clear, true) => ((10, 18, 46), (186, 212, 255)),
        (ThemeCondition::Cloudy, false) => ((84, 101, 122), (226, 232, 240)),
        (ThemeCondition::Cloudy, true) => ((26, 32, 46), (190, 202, 220)),
        (ThemeCondition::Rainy, false) => ((52, 72, 98), (150, 205, 250)),
        (ThemeCondition::Rainy, true) => ((16, 26, 44), (138, 186, 240)),
        (ThemeCondition::Drizzle, false) => ((74, 98, 124), (170, 214, 245)),
        (ThemeCondition::Drizzle, true) => ((22, 34, 52), (150, 194, 236)),
        (ThemeCondition::Stormy, false) => ((40, 38, 70), (255, 220, 110)),
        (ThemeCondition::Stormy, true) => ((14, 12, 32), (255, 206, 96)),
        (ThemeCondition::Snow, false) => ((92, 118, 146), (244, 250, 255)),
        (ThemeCondition::Snow, true) => ((30, 44, 64), (226, 240, 255)),
    }
}

pub fn theme_for(key: ThemeKey, capability: ColorCapability) -> Theme {
    let (sky, accent_seed) = seeds(key);
    let rgb = |(r, g, b): Rgb| quantize(Color::Rgb(r, g, b), capability);

    if capability == ColorCapability::Basic16 {
        return Theme {
            sky,
            background: Color::Black,
            surface: Color::Black,
            popup_surface: Color::Blue,
            accent: Color::Cyan,
            text: Color::White,
            muted_text: Color::Gray,
            border: Color::LightCyan,
            popup_border: Color::Yellow,
            danger: Color::LightRed,
            temp_cold: Color::Cyan,
            temp_mild: Color::Green,
            temp_warm: Color::Yellow,
            temp_hot: Color::LightRed,
        };
    }

    let surface = mix_rgb(sky, (8, 12, 20), 0.55);
    let popup_surface = mix_rgb(surface, (236, 243, 251), 0.12);
    let backgrounds = [sky, surface, popup_surface];
    let text = ensure_contrast((240, 245, 250), &backgrounds, 4.5);
    let muted = ensure_contrast((183, 198, 214), &backgrounds, 3.0);
    let accent = ensure_contrast(accent_seed, &backgrounds, 3.0);
    let border = ensure_contrast(mix_rgb(surface, accent, 0.54), &[sky, surface], 2.2);

    Theme {
        sky,
        background: rgb(sky),
        surface: rgb(surface),
        popup_surface: rgb(popup_surface),
        accent: rgb(accent),
        text: rgb(text),
        muted_text: rgb(muted),
        border: rgb(border),
        popup_border: rgb(ensure_contrast(accent_seed, &[popup_surface], 2.6)),
        danger: rgb(ensure_contrast((248, 113, 113), &backgrounds, 3.0)),
        temp_cold: rgb(ensure_contrast((56, 189, 248), &[surface], 2.3)),
        temp_mild: rgb(ensure_contrast((110, 231, 183), &[surface], 2.3)),
        temp_warm: rgb(ensure_contrast((251, 191, 36), &[surface], 2.3)),
        temp_hot: rgb(ensure_contrast((248, 113, 113), &[surface], 2.3)),
    }
}

pub fn temp_color(theme: &Theme, temp: f32) -> Color {
    if temp <= 2.0 {
        theme.temp_cold
    } else if temp <= 16.0 {
        theme.temp_mild
    } else if temp <= 28.0 {
        theme.temp_warm
    } else {
        theme.temp_hot
    }
}

pub(crate) fn mix_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| -> u8 {
        (f32::from(x) + (f32::from(y) - f32::from(x)) * t)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn ensure_contrast(fg: Rgb, backgrounds: &[Rgb], min_ratio: f32) -> Rgb {
    if backgrounds.is_empty() || min_contrast_ratio(fg, backgrounds) >= min_ratio {
        return fg;
    }

    let target = if min_contrast_ratio((255, 255, 255), backgrounds)
        >= min_contrast_ratio((0, 0, 0), backgrounds)
    {
        (255, 255, 255)
    } else {
        (0, 0, 0)
    };

    let mut best = fg;
    let mut best_ratio = min_contrast_ratio(fg, backgrounds);
    for step in 1..=24 {
        let candidate = mix_rgb(fg, target, step as f32 / 24.0);
        let ratio = min_contrast_ratio(candidate, backgrounds);
        if ratio >= min_ratio {
            return candidate;
        }
        if ratio > best_ratio {
            best = candidate;
            best_ratio = ratio;
        }
    }
    best
}

fn min_contrast_ratio(color: Rgb, backgrounds: &[Rgb]) -> f32 {
    backgrounds
        .iter()
        .map(|bg| contrast_ratio(color, *bg))
        .fold(f32::INFINITY, f32::min)
}

pub(crate) fn contrast_ratio(a: Rgb, b: Rgb) -> f32 {
    let l1 = relative_luminance(a);
    let l2 = relative_luminance(b);
    let (hi, lo) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (hi + 0.05) / (lo + 0.05)
}

fn relative_luminance(rgb: Rgb) -> f32 {
    0.2126 * srgb_to_linear(rgb.0) + 0.7152 * srgb_to_linear(rgb.1) + 0.0722 * srgb_to_linear(rgb.2)
}

fn srgb_to_linear(v: u8) -> f32 {
    let s = f32::from(v) / 255.0;
    if s <= 0.04045 {
        s / 12.92
    } else {
        ((s + 0.055) / 1.055).powf(2.4)
    }
}

pub fn quantize(color: Color, capability: ColorCapability) -> Color {
    match (capability, color) {
        (ColorCapability::Xterm256, Color::Rgb(r, g, b)) => {
            let to_cube = |v: u8| -> u8 { ((f32::from(v) / 255.0) * 5.0).round() as u8 };
            Color::Indexed(16 + 36 * to_cube(r) + 6 * to_cube(g) + to_cube(b))
        }
        (ColorCapability::Basic16, Color::Rgb(r, g, b)) => basic16_from_rgb(r, g, b),
        (_, c) => c,
    }
}

fn basic16_from_rgb(r: u8, g: u8, b: u8) -> Color {
    let (rf, gf, bf) = (
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    );
    let max = rf.max(gf.max(bf));
    let min = rf.min(gf.min(bf));
    let light = (max + min) / 2.0;

    if max - min < 0.08 {
        return match light {
            l if l < 0.20 => Color::Black,
            l if l < 0.40 => Color::DarkGray,
            l if l < 0.72 => Color::Gray,
            _ => Color::White,
        };
    }

    let bright = light >= 0.55;
    let pick = |dark: Color, lit: Color| if bright { lit } else { dark };
    if bf >= rf && bf >= gf {
        if gf > bf * 0.75 {
            pick(Color::Cyan, Color::LightCyan)
        } else {
            pick(Color::Blue, Color::LightBlue)
        }
    } else if rf >= gf {
        if gf > rf * 0.6 {
            pick(Color::Yellow, Color::LightYellow)
        } else {
            pick(Color::Red, Color::LightRed)
        }
    } else {
        pick(Color::Green, Color::LightGreen)
    }
}
