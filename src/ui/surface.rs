//! Drawing surface used by the effect layers, plus [`DisplayList`], the
//! recording implementation the terminal canvas rasterises each frame.

use std::f32::consts::TAU;

const CUBIC_STEPS: usize = 12;
const ARC_STEPS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(255, 255, 255, 0.0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    #[must_use]
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
    /// Full circle; always forms its own closed sub-path.
    Arc { center: Point, radius: f32 },
    Close,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    ops: Vec<PathOp>,
}

impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn line(from: Point, to: Point) -> Self {
        Self::new().move_to(from).line_to(to)
    }

    #[must_use]
    pub fn circle(center: Point, radius: f32) -> Self {
        Self::new().arc(center, radius)
    }

    #[must_use]
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new()
            .move_to(Point::new(x, y))
            .line_to(Point::new(x + width, y))
            .line_to(Point::new(x + width, y + height))
            .line_to(Point::new(x, y + height))
            .close()
    }

    #[must_use]
    pub fn move_to(mut self, to: Point) -> Self {
        self.ops.push(PathOp::MoveTo(to));
        self
    }

    #[must_use]
    pub fn line_to(mut self, to: Point) -> Self {
        self.ops.push(PathOp::LineTo(to));
        self
    }

    #[must_use]
    pub fn cubic_to(mut self, c1: Point, c2: Point, to: Point) -> Self {
        self.ops.push(PathOp::CubicTo { c1, c2, to });
        self
    }

    #[must_use]
    pub fn arc(mut self, center: Point, radius: f32) -> Self {
        self.ops.push(PathOp::Arc { center, radius });
        self
    }

    #[must_use]
    pub fn close(mut self) -> Self {
        self.ops.push(PathOp::Close);
        self
    }

    #[must_use]
    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    /// Flattens curves and arcs into polylines, one per sub-path.
    #[must_use]
    pub fn subpaths(&self) -> Vec<Vec<Point>> {
        let mut out = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        for op in &self.ops {
            match *op {
                PathOp::MoveTo(to) => {
                    flush(&mut out, &mut current);
                    current.push(to);
                }
                PathOp::LineTo(to) => current.push(to),
                PathOp::CubicTo { c1, c2, to } => {
                    let from = current.last().copied().unwrap_or(c1);
                    if current.is_empty() {
                        current.push(from);
                    }
                    for step in 1..=CUBIC_STEPS {
                        let t = step as f32 / CUBIC_STEPS as f32;
                        current.push(cubic_point(from, c1, c2, to, t));
                    }
                }
                PathOp::Arc { center, radius } => {
                    flush(&mut out, &mut current);
                    let ring = (0..=ARC_STEPS)
                        .map(|step| {
                            let angle = TAU * step as f32 / ARC_STEPS as f32;
                            Point::new(
                                center.x + radius * angle.cos(),
                                center.y + radius * angle.sin(),
                            )
                        })
                        .collect();
                    out.push(ring);
                }
                PathOp::Close => {
                    if let Some(first) = current.first().copied() {
                        current.push(first);
                    }
                    flush(&mut out, &mut current);
                }
            }
        }
        flush(&mut out, &mut current);
        out
    }

    /// Fill test: inside any closed sub-path (even-odd within a sub-path).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        polygons_contain(&self.subpaths(), point)
    }

    /// Axis-aligned bounds as `(min, max)`.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut points = self.subpaths().into_iter().flatten();
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }
}

fn flush(out: &mut Vec<Vec<Point>>, current: &mut Vec<Point>) {
    if !current.is_empty() {
        out.push(std::mem::take(current));
    }
}

fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// Fill test against already flattened sub-paths, see [`Path::subpaths`].
#[must_use]
pub fn polygons_contain(polygons: &[Vec<Point>], point: Point) -> bool {
    polygons
        .iter()
        .any(|polygon| polygon.len() >= 3 && polygon_contains(polygon, point))
}

fn polygon_contains(polygon: &[Point], point: Point) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub radius: f32,
    pub inner: Rgba,
    pub outer: Rgba,
}

impl RadialGradient {
    #[must_use]
    pub fn color_at(&self, point: Point) -> Rgba {
        if self.radius <= 0.0 {
            return self.outer;
        }
        let distance = (point.x - self.center.x).hypot(point.y - self.center.y);
        self.inner.lerp(self.outer, distance / self.radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

pub trait Surface {
    fn size(&self) -> (f32, f32);
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_brightness(&mut self, brightness: f32);
    /// Blur radius of the glow drawn around strokes; zero disables it.
    fn set_glow(&mut self, blur: f32);
    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32);
    fn fill_path(&mut self, path: &Path, paint: &Paint);

    fn clear(&mut self) {
        let (width, height) = self.size();
        self.clear_rect(0.0, 0.0, width, height);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Stroke {
        path: Path,
        color: Rgba,
        width: f32,
        alpha: f32,
        glow: f32,
    },
    Fill {
        path: Path,
        paint: Paint,
        alpha: f32,
    },
}

impl DrawCommand {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Stroke { path, .. } | Self::Fill { path, .. } => path,
        }
    }
}

/// A recorded frame. Commands carry the alpha and glow that were current
/// when they were issued; brightness applies to the whole frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    width: f32,
    height: f32,
    alpha: f32,
    glow: f32,
    brightness: f32,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            alpha: 1.0,
            glow: 0.0,
            brightness: 1.0,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for DisplayList {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if x <= 0.0 && y <= 0.0 && x + width >= self.width && y + height >= self.height {
            self.commands.clear();
            return;
        }
        self.commands.retain(|command| {
            command.path().bounds().is_none_or(|(min, max)| {
                min.x < x || min.y < y || max.x > x + width || max.y > y + height
            })
        });
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_brightness(&mut self, brightness: f32) {
        self.brightness = brightness.max(0.0);
    }

    fn set_glow(&mut self, blur: f32) {
        self.glow = blur.max(0.0);
    }

    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            color,
            width,
            alpha: self.alpha,
            glow: self.glow,
        });
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            paint: *paint,
            alpha: self.alpha,
        });
    }
}
