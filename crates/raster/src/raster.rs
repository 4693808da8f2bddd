//! CPU raster surface.
//!
//! An opaque RGB framebuffer that executes [`DrawCommand`]s with source-over
//! blending and analytic anti-aliasing. Coverage of every shape is computed
//! per pixel from the distance between the pixel center and the shape edge,
//! so edges fade over about one pixel.
//!
//! Like a browser canvas, resizing clears the buffer to the background.

use std::f64::consts::TAU;
use std::ops::Range;

use glam::{DVec2, DVec3};
use magnaflux_core::color::Rgba;
use magnaflux_core::palette;
use magnaflux_core::surface::{gradient_color, DrawCommand, Glow, GradientStop, Stroke, Surface};

/// Segments used to approximate an ellipse outline.
const ELLIPSE_SEGMENTS: usize = 96;
/// Peak opacity of a glow halo right at the shape edge.
const HALO_STRENGTH: f64 = 0.6;

/// Opaque RGB framebuffer, components in [0, 1].
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<DVec3>,
}

fn rgb(c: Rgba) -> DVec3 {
    DVec3::new(c.r, c.g, c.b)
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    let t = if len2 > 0.0 {
        ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (p - (a + ab * t)).length()
}

/// Halo opacity at `d` px outside a shape's edge: a gaussian with sigma
/// `blur / 2`, cut off at `1.5 * blur`.
fn halo_strength(d: f64, glow: Glow) -> f64 {
    if d <= 0.0 || d >= glow.blur * 1.5 {
        return 0.0;
    }
    let k = d / (glow.blur * 0.5);
    HALO_STRENGTH * (-0.5 * k * k).exp()
}

fn usable_glow(glow: Option<Glow>) -> Option<Glow> {
    glow.filter(|g| positive(g.blur))
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Coverage of a pixel whose center is `d` px from the middle of a stroke.
///
/// Strokes thinner than a pixel are drawn one pixel wide at reduced opacity.
fn stroke_coverage(d: f64, width: f64) -> f64 {
    let half = width * 0.5;
    (half + 0.5 - d).clamp(0.0, 1.0) * width.min(1.0)
}

impl Raster {
    /// A `width` x `height` raster filled with the background color.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![rgb(palette::background()); len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[DVec3] {
        &self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.pixels[y as usize * self.width as usize + x as usize];
        Some(Rgba {
            r: c.x,
            g: c.y,
            b: c.z,
            a: 1.0,
        })
    }

    /// Overwrites every pixel with the background color.
    pub fn clear(&mut self) {
        self.pixels.fill(rgb(palette::background()));
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f64) {
        let a = color.a * coverage;
        if a <= 0.0 || !a.is_finite() {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        let px = &mut self.pixels[idx];
        *px = px.lerp(rgb(color), a.min(1.0));
    }

    /// Pixel columns and rows touched by the box `min`..`max`, clipped.
    fn span(&self, min: DVec2, max: DVec2) -> Option<(Range<u32>, Range<u32>)> {
        if !(min.is_finite() && max.is_finite()) {
            return None;
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().min(f64::from(self.width))).max(0.0) as u32;
        let y1 = (max.y.ceil().min(f64::from(self.height))).max(0.0) as u32;
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0..x1, y0..y1))
    }

    fn center_of(x: u32, y: u32) -> DVec2 {
        DVec2::new(f64::from(x) + 0.5, f64::from(y) + 0.5)
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Rgba) {
        let lo = origin.min(origin + size);
        let hi = origin.max(origin + size);
        let Some((xs, ys)) = self.span(lo, hi) else {
            return;
        };
        for y in ys {
            let fy = f64::from(y);
            let cov_y = ((fy + 1.0).min(hi.y) - fy.max(lo.y)).clamp(0.0, 1.0);
            for x in xs.clone() {
                let fx = f64::from(x);
                let cov_x = ((fx + 1.0).min(hi.x) - fx.max(lo.x)).clamp(0.0, 1.0);
                self.blend(x, y, color, cov_x * cov_y);
            }
        }
    }

    fn halo(&mut self, center: DVec2, radius: f64, glow: Glow) {
        let reach = radius + glow.blur * 1.5;
        let Some((xs, ys)) = self.span(center - reach, center + reach) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                let d = Self::center_of(x, y).distance(center);
                self.blend(x, y, glow.color, halo_strength(d - radius, glow));
            }
        }
    }

    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Rgba, glow: Option<Glow>) {
        if radius.is_nan() || radius < 0.0 {
            return;
        }
        if let Some(glow) = usable_glow(glow) {
            self.halo(center, radius, glow);
        }
        let reach = radius + 1.0;
        let Some((xs, ys)) = self.span(center - reach, center + reach) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                let d = Self::center_of(x, y).distance(center);
                self.blend(x, y, color, (radius + 0.5 - d).clamp(0.0, 1.0));
            }
        }
    }

    /// Strokes a polyline. Coverage is the max over all segments, so
    /// translucent joints are not blended twice. A glow is painted under
    /// the line from the distance to the nearest segment.
    fn stroke_path(&mut self, points: &[DVec2], stroke: Stroke) {
        if points.len() < 2 || !positive(stroke.width) || points.iter().any(|p| !p.is_finite()) {
            return;
        }
        let glow = usable_glow(stroke.glow);
        let half = stroke.width * 0.5;
        let reach = half + 1.0 + glow.map_or(0.0, |g| g.blur * 1.5);
        let (lo, hi) = points
            .iter()
            .fold((points[0], points[0]), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        let Some((xs, ys)) = self.span(lo - reach, hi + reach) else {
            return;
        };
        let cols = (xs.end - xs.start) as usize;
        let mut nearest = vec![f64::INFINITY; cols * (ys.end - ys.start) as usize];

        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let Some((sx, sy)) = self.span(a.min(b) - reach, a.max(b) + reach) else {
                continue;
            };
            for y in sy {
                for x in sx.clone() {
                    let d = segment_distance(Self::center_of(x, y), a, b);
                    let idx = (y - ys.start) as usize * cols + (x - xs.start) as usize;
                    if d < nearest[idx] {
                        nearest[idx] = d;
                    }
                }
            }
        }

        for (i, d) in nearest.into_iter().enumerate() {
            if !d.is_finite() {
                continue;
            }
            let x = xs.start + (i % cols) as u32;
            let y = ys.start + (i / cols) as u32;
            if let Some(glow) = glow {
                self.blend(x, y, glow.color, halo_strength(d - half, glow));
            }
            self.blend(x, y, stroke.color, stroke_coverage(d, stroke.width));
        }
    }

    fn stroke_circle(&mut self, center: DVec2, radius: f64, stroke: Stroke) {
        if radius.is_nan() || radius < 0.0 || !positive(stroke.width) {
            return;
        }
        let glow = usable_glow(stroke.glow);
        let half = stroke.width * 0.5;
        let reach = radius + half + 1.0 + glow.map_or(0.0, |g| g.blur * 1.5);
        let Some((xs, ys)) = self.span(center - reach, center + reach) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                let d = (Self::center_of(x, y).distance(center) - radius).abs();
                if let Some(glow) = glow {
                    self.blend(x, y, glow.color, halo_strength(d - half, glow));
                }
                self.blend(x, y, stroke.color, stroke_coverage(d, stroke.width));
            }
        }
    }

    fn stroke_ellipse(&mut self, center: DVec2, radii: DVec2, rotation: f64, stroke: Stroke) {
        if radii.is_nan() || radii.min_element() < 0.0 {
            return;
        }
        let turn = DVec2::from_angle(rotation);
        let points: Vec<DVec2> = (0..=ELLIPSE_SEGMENTS)
            .map(|i| {
                let theta = i as f64 / ELLIPSE_SEGMENTS as f64 * TAU;
                center + turn.rotate(DVec2::new(radii.x * theta.cos(), radii.y * theta.sin()))
            })
            .collect();
        self.stroke_path(&points, stroke);
    }

    fn fill_radial_gradient(&mut self, center: DVec2, radius: f64, stops: &[GradientStop]) {
        if !positive(radius) || stops.is_empty() {
            return;
        }
        let reach = radius + 1.0;
        let Some((xs, ys)) = self.span(center - reach, center + reach) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                let d = Self::center_of(x, y).distance(center);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    let color = gradient_color(stops, (d / radius).min(1.0));
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }
}

impl Surface for Raster {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        log::debug!(
            "raster resize {}x{} -> {width}x{height}",
            self.width,
            self.height
        );
        *self = Raster::new(width, height);
    }

    fn draw(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::FillRect {
                origin,
                size,
                color,
            } => self.fill_rect(origin, size, color),
            DrawCommand::FillDisc {
                center,
                radius,
                color,
                glow,
            } => self.fill_disc(center, radius, color, glow),
            DrawCommand::StrokePath { points, stroke } => self.stroke_path(&points, stroke),
            DrawCommand::StrokeCircle {
                center,
                radius,
                stroke,
            } => self.stroke_circle(center, radius, stroke),
            DrawCommand::StrokeEllipse {
                center,
                radii,
                rotation,
                stroke,
            } => self.stroke_ellipse(center, radii, rotation, stroke),
            DrawCommand::FillRadialGradient {
                center,
                radius,
                stops,
            } => self.fill_radial_gradient(center, radius, &stops),
        }
    }
}
