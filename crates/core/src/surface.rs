//! Drawing surface abstraction.
//!
//! The simulation describes each frame as a sequence of [`DrawCommand`]s
//! issued to a [`Surface`]. Surfaces are painted over, never cleared: the
//! background wash is just another translucent `FillRect`, which is what
//! leaves motion trails behind the particles.
//!
//! [`RecordingSurface`] keeps the commands instead of rasterizing them, so
//! frame contents can be asserted on directly.

use glam::DVec2;

use crate::color::Rgba;

/// Stroke style for outlines and paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
    /// Halo around the stroked line, if any.
    pub glow: Option<Glow>,
}

impl Stroke {
    pub fn new(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            glow: None,
        }
    }

    pub fn with_glow(mut self, glow: Option<Glow>) -> Self {
        self.glow = glow;
        self
    }
}

/// Soft halo drawn around a shape, like a canvas shadow with zero offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f64,
}

/// A color stop of a radial gradient, `offset` in [0, 1] from center to rim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba,
}

/// One drawing operation, composited source-over onto the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        origin: DVec2,
        size: DVec2,
        color: Rgba,
    },
    FillDisc {
        center: DVec2,
        radius: f64,
        color: Rgba,
        glow: Option<Glow>,
    },
    /// Open polyline through `points`.
    StrokePath { points: Vec<DVec2>, stroke: Stroke },
    StrokeCircle {
        center: DVec2,
        radius: f64,
        stroke: Stroke,
    },
    /// Ellipse with semi-axes `radii`, rotated by `rotation` radians.
    StrokeEllipse {
        center: DVec2,
        radii: DVec2,
        rotation: f64,
        stroke: Stroke,
    },
    /// Disc of `radius` filled with a radial gradient.
    FillRadialGradient {
        center: DVec2,
        radius: f64,
        stops: Vec<GradientStop>,
    },
}

impl DrawCommand {
    /// Short kind label, used in logs and test assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            DrawCommand::FillRect { .. } => "fill_rect",
            DrawCommand::FillDisc { .. } => "fill_disc",
            DrawCommand::StrokePath { .. } => "stroke_path",
            DrawCommand::StrokeCircle { .. } => "stroke_circle",
            DrawCommand::StrokeEllipse { .. } => "stroke_ellipse",
            DrawCommand::FillRadialGradient { .. } => "fill_radial_gradient",
        }
    }
}

/// Evaluates a gradient at `t` in [0, 1].
///
/// Before the first stop the first color holds, after the last stop the last
/// color holds, in between colors interpolate linearly. No stops yields
/// transparent.
pub fn gradient_color(stops: &[GradientStop], t: f64) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= f64::EPSILON {
                return b.color;
            }
            return a.color.lerp(b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}

/// A raster target the visualizer draws into.
///
/// The frame loop owns exactly one surface. Size is in pixels; a zero size
/// means the host container has no area yet.
pub trait Surface {
    /// Current size in pixels as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Resynchronizes the surface with its container.
    fn resize(&mut self, width: u32, height: u32);

    /// Composites one command.
    fn draw(&mut self, command: DrawCommand);

    /// Whether the surface currently has drawable area.
    fn is_drawable(&self) -> bool {
        let (w, h) = self.size();
        w > 0 && h > 0
    }
}

/// A surface that records commands instead of painting them.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Every command drawn since creation or the last [`clear`](Self::clear).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forgets recorded commands, e.g. between frames.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded commands of the given [`DrawCommand::kind`].
    pub fn count(&self, kind: &str) -> usize {
        self.commands.iter().filter(|c| c.kind() == kind).count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<GradientStop> {
        vec![
            GradientStop {
                offset: 0.0,
                color: Rgba::BLACK,
            },
            GradientStop {
                offset: 0.9,
                color: Rgba::BLACK,
            },
            GradientStop {
                offset: 1.0,
                color: Rgba::TRANSPARENT,
            },
        ]
    }

    #[test]
    fn gradient_holds_core_then_fades() {
        let s = stops();
        assert_eq!(gradient_color(&s, 0.0), Rgba::BLACK);
        assert_eq!(gradient_color(&s, 0.5), Rgba::BLACK);
        assert!((gradient_color(&s, 0.95).a - 0.5).abs() < 1e-9);
        assert_eq!(gradient_color(&s, 1.0), Rgba::TRANSPARENT);
        assert_eq!(gradient_color(&s, 3.0), Rgba::TRANSPARENT);
    }

    #[test]
    fn gradient_without_stops_is_transparent() {
        assert_eq!(gradient_color(&[], 0.5), Rgba::TRANSPARENT);
    }

    #[test]
    fn recording_surface_keeps_commands_in_order() {
        let mut s = RecordingSurface::new(10, 10);
        s.draw(DrawCommand::FillRect {
            origin: DVec2::ZERO,
            size: DVec2::new(10.0, 10.0),
            color: Rgba::BLACK,
        });
        s.draw(DrawCommand::StrokeCircle {
            center: DVec2::new(5.0, 5.0),
            radius: 2.0,
            stroke: Stroke::new(Rgba::WHITE, 1.0),
        });
        let kinds: Vec<&str> = s.commands().iter().map(DrawCommand::kind).collect();
        assert_eq!(kinds, vec!["fill_rect", "stroke_circle"]);
        assert_eq!(s.count("fill_rect"), 1);
        s.clear();
        assert!(s.commands().is_empty());
    }

    #[test]
    fn strokes_have_no_glow_unless_asked() {
        let plain = Stroke::new(Rgba::WHITE, 2.0);
        assert!(plain.glow.is_none());
        let halo = Glow {
            color: Rgba::WHITE,
            blur: 10.0,
        };
        assert_eq!(plain.with_glow(Some(halo)).glow, Some(halo));
    }

    #[test]
    fn zero_sized_surface_is_not_drawable() {
        let mut s = RecordingSurface::new(0, 300);
        assert!(!s.is_drawable());
        s.resize(400, 300);
        assert!(s.is_drawable());
        assert_eq!(s.size(), (400, 300));
    }

    #[test]
    fn surface_is_object_safe() {
        let mut s = RecordingSurface::new(4, 4);
        let dyn_surface: &mut dyn Surface = &mut s;
        dyn_surface.draw(DrawCommand::FillDisc {
            center: DVec2::ONE,
            radius: 1.0,
            color: Rgba::WHITE,
            glow: None,
        });
        assert_eq!(s.count("fill_disc"), 1);
    }
}
