//! Rasterises a recorded effects frame into terminal cells.
//!
//! Every cell stands for 8×16 virtual pixels and carries a 2×4 braille dot
//! grid. Fills that cover a whole cell tint its background; partial fills and
//! strokes light individual dots.

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::ui::{
    surface::{DisplayList, DrawCommand, Paint, Path, Point, Rgba, polygons_contain},
    theme::{ColorCapability, Rgb, mix_rgb, quantize},
};

pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;
const DOT_PX: f32 = 4.0;
const MIN_ALPHA: f32 = 0.05;
const BRAILLE_BASE: u32 = 0x2800;
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// Virtual surface size for a terminal area.
#[must_use]
pub fn surface_size(area: Rect) -> (f32, f32) {
    (
        f32::from(area.width) * CELL_WIDTH_PX,
        f32::from(area.height) * CELL_HEIGHT_PX,
    )
}

pub struct SkyCanvas<'a> {
    pub frame: &'a DisplayList,
    pub sky: Rgb,
    pub capability: ColorCapability,
}

impl Widget for SkyCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut raster = Raster::new(usize::from(area.width), usize::from(area.height), self.sky);
        for command in self.frame.commands() {
            match command {
                DrawCommand::Fill { path, paint, alpha } => raster.fill(path, paint, *alpha),
                DrawCommand::Stroke {
                    path,
                    color,
                    alpha,
                    glow,
                    ..
                } => raster.stroke(path, *color, *alpha, *glow),
            }
        }

        let brightness = self.frame.brightness();
        for (index, ink) in raster.cells.iter().enumerate() {
            let x = area.x + (index % raster.cols) as u16;
            let y = area.y + (index / raster.cols) as u16;
            let Some(cell) = buf.cell_mut((x, y)) else {
                continue;
            };
            let bg = brighten(ink.bg, brightness);
            cell.set_bg(quantize(Color::Rgb(bg.0, bg.1, bg.2), self.capability));
            match ink.ink {
                Some((color, alpha)) if ink.dots != 0 => {
                    let fg = brighten(mix_rgb(ink.bg, color, alpha), brightness);
                    cell.set_char(char::from_u32(BRAILLE_BASE + u32::from(ink.dots)).unwrap_or(' '))
                        .set_fg(quantize(Color::Rgb(fg.0, fg.1, fg.2), self.capability));
                }
                _ => {
                    cell.set_char(' ');
                }
            }
        }
    }
}

fn brighten(rgb: Rgb, brightness: f32) -> Rgb {
    let scale = |v: u8| (f32::from(v) * brightness).round().clamp(0.0, 255.0) as u8;
    (scale(rgb.0), scale(rgb.1), scale(rgb.2))
}

#[derive(Debug, Clone, Copy)]
struct CellInk {
    bg: Rgb,
    dots: u8,
    ink: Option<(Rgb, f32)>,
}

struct Raster {
    cols: usize,
    rows: usize,
    cells: Vec<CellInk>,
}

impl Raster {
    fn new(cols: usize, rows: usize, sky: Rgb) -> Self {
        Self {
            cols,
            rows,
            cells: vec![
                CellInk {
                    bg: sky,
                    dots: 0,
                    ink: None,
                };
                cols * rows
            ],
        }
    }

    fn cell_mut(&mut self, col: usize, row: usize) -> Option<&mut CellInk> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get_mut(row * self.cols + col)
    }

    fn dot(&mut self, point: Point, color: Rgb, alpha: f32) {
        if point.x < 0.0 || point.y < 0.0 {
            return;
        }
        let col = (point.x / CELL_WIDTH_PX) as usize;
        let row = (point.y / CELL_HEIGHT_PX) as usize;
        let dx = ((point.x % CELL_WIDTH_PX) / DOT_PX) as usize;
        let dy = ((point.y % CELL_HEIGHT_PX) / DOT_PX) as usize;
        let Some(cell) = self.cell_mut(col, row) else {
            return;
        };
        cell.dots |= DOT_BITS[dx.min(1)][dy.min(3)];
        if cell.ink.is_none_or(|(_, current)| alpha >= current) {
            cell.ink = Some((color, alpha));
        }
    }

    fn fill(&mut self, path: &Path, paint: &Paint, alpha: f32) {
        let Some((min, max)) = path.bounds() else {
            return;
        };
        let polygons = path.subpaths();
        let col_start = (min.x / CELL_WIDTH_PX).floor().max(0.0) as usize;
        let row_start = (min.y / CELL_HEIGHT_PX).floor().max(0.0) as usize;
        let col_end = ((max.x / CELL_WIDTH_PX).ceil().max(0.0) as usize).min(self.cols);
        let row_end = ((max.y / CELL_HEIGHT_PX).ceil().max(0.0) as usize).min(self.rows);

        for row in row_start..row_end {
            for col in col_start..col_end {
                let origin = Point::new(col as f32 * CELL_WIDTH_PX, row as f32 * CELL_HEIGHT_PX);
                let inside: Vec<Point> = dot_centers(origin)
                    .filter(|center| polygons_contain(&polygons, *center))
                    .collect();
                if inside.is_empty() {
                    continue;
                }
                if inside.len() == 8 {
                    let center = Point::new(
                        origin.x + CELL_WIDTH_PX / 2.0,
                        origin.y + CELL_HEIGHT_PX / 2.0,
                    );
                    let color = paint_at(paint, center);
                    let strength = color.a * alpha;
                    if strength >= MIN_ALPHA {
                        if let Some(cell) = self.cell_mut(col, row) {
                            cell.bg = mix_rgb(cell.bg, rgb(color), strength);
                        }
                    }
                    continue;
                }
                for center in inside {
                    let color = paint_at(paint, center);
                    let strength = color.a * alpha;
                    if strength >= MIN_ALPHA {
                        self.dot(center, rgb(color), strength);
                    }
                }
            }
        }
    }

    fn stroke(&mut self, path: &Path, color: Rgba, alpha: f32, glow: f32) {
        let strength = color.a * alpha;
        if strength < MIN_ALPHA {
            return;
        }
        let halo = if glow > 0.0 {
            (glow / DOT_PX).ceil() as i32
        } else {
            0
        };
        for polygon in path.subpaths() {
            for segment in polygon.windows(2) {
                let (from, to) = (segment[0], segment[1]);
                let length = (to.x - from.x).hypot(to.y - from.y);
                let steps = (length / (DOT_PX / 2.0)).ceil().max(1.0) as usize;
                for step in 0..=steps {
                    let t = step as f32 / steps as f32;
                    let point = Point::new(
                        from.x + (to.x - from.x) * t,
                        from.y + (to.y - from.y) * t,
                    );
                    self.dot(point, rgb(color), strength);
                    for offset in (1..=halo).flat_map(|n| [-n, n]) {
                        let shifted = Point::new(point.x + offset as f32 * DOT_PX, point.y);
                        self.dot(shifted, rgb(color), strength * 0.5);
                    }
                }
            }
        }
    }
}

fn rgb(color: Rgba) -> Rgb {
    (color.r, color.g, color.b)
}

fn paint_at(paint: &Paint, point: Point) -> Rgba {
    match paint {
        Paint::Solid(color) => *color,
        Paint::Radial(gradient) => gradient.color_at(point),
    }
}

fn dot_centers(origin: Point) -> impl Iterator<Item = Point> {
    (0..2).flat_map(move |dx| {
        (0..4).map(move |dy| {
            Point::new(
                origin.x + dx as f32 * DOT_PX + DOT_PX / 2.0,
                origin.y + dy as f32 * DOT_PX + DOT_PX / 2.0,
            )
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::surface::Surface;

    const SKY: Rgb = (10, 20, 40);

    fn draw(frame: &DisplayList, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        SkyCanvas {
            frame,
            sky: SKY,
            capability: ColorCapability::TrueColor,
        }
        .render(area, &mut buf);
        buf
    }

    #[test]
    fn empty_frame_paints_plain_sky() {
        let frame = DisplayList::new(80.0, 64.0);
        let buf = draw(&frame, 10, 4);
        for cell in buf.content() {
            assert_eq!(cell.symbol(), " ");
            assert_eq!(cell.bg, Color::Rgb(10, 20, 40));
        }
    }

    #[test]
    fn strokes_light_braille_dots() {
        let mut frame = DisplayList::new(80.0, 64.0);
        frame.stroke_path(
            &Path::line(Point::new(2.0, 2.0), Point::new(2.0, 14.0)),
            Rgba::WHITE,
            1.0,
        );
        let buf = draw(&frame, 10, 4);
        // Left column of dots in the first cell.
        assert_eq!(buf[(0, 0)].symbol(), "\u{2847}");
        assert_eq!(buf[(1, 0)].symbol(), " ");
    }

    #[test]
    fn covering_fill_tints_background() {
        let mut frame = DisplayList::new(80.0, 64.0);
        frame.set_global_alpha(0.5);
        frame.fill_path(&Path::rect(0.0, 0.0, 80.0, 64.0), &Paint::Solid(Rgba::WHITE));
        let buf = draw(&frame, 10, 4);
        assert_eq!(buf[(3, 2)].bg, Color::Rgb(133, 138, 148));
        assert_eq!(buf[(3, 2)].symbol(), " ");
    }

    #[test]
    fn brightness_scales_the_whole_frame() {
        let mut frame = DisplayList::new(80.0, 64.0);
        frame.set_brightness(2.0);
        let buf = draw(&frame, 10, 4);
        assert_eq!(buf[(0, 0)].bg, Color::Rgb(20, 40, 80));
    }

    #[test]
    fn faint_ink_is_skipped() {
        let mut frame = DisplayList::new(80.0, 64.0);
        frame.set_global_alpha(0.01);
        frame.stroke_path(
            &Path::line(Point::new(0.0, 0.0), Point::new(80.0, 64.0)),
            Rgba::WHITE,
            1.0,
        );
        let buf = draw(&frame, 10, 4);
        assert!(buf.content().iter().all(|cell| cell.symbol() == " "));
    }

    #[test]
    fn surface_size_uses_virtual_pixels() {
        assert_eq!(surface_size(Rect::new(0, 0, 100, 30)), (800.0, 480.0));
    }
}
