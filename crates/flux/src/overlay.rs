//! Decorative anomaly overlays, drawn on top of everything else.
//!
//! Overlays read only the surface size, field time and the random source;
//! they never look at particle state. Active anomalies are drawn in
//! [`Anomaly::ALL`] order no matter how the host listed them.

use std::f64::consts::TAU;

use glam::DVec2;
use magnaflux_core::color::Rgba;
use magnaflux_core::palette::{self, ParticleHue};
use magnaflux_core::prng::RandomSource;
use magnaflux_core::state::{Anomaly, AnomalySet};
use magnaflux_core::surface::{DrawCommand, GradientStop, Stroke, Surface};

use crate::integrator::HORIZON_RADIUS;

/// Number of tachyon streaks.
pub const TACHYON_STREAKS: usize = 8;
/// Number of jittered radial strokes around the pinch ring.
pub const PINCH_STROKES: usize = 4;
const PINCH_STROKE_SEGMENTS: usize = 5;
const PINCH_SEGMENT_LENGTH: f64 = 20.0;
const PINCH_JITTER: f64 = 30.0;
/// Number of accretion ellipses around the horizon.
pub const ACCRETION_RINGS: usize = 3;
/// Radius of the horizon's gradient disc.
pub const HORIZON_DISC_RADIUS: f64 = HORIZON_RADIUS + 15.0;

/// What an overlay may look at.
#[derive(Debug, Clone, Copy)]
pub struct OverlayFrame {
    pub size: DVec2,
    pub t: f64,
}

impl OverlayFrame {
    fn center(&self) -> DVec2 {
        self.size * 0.5
    }
}

/// Draws every active overlay in fixed order.
pub fn draw_overlays(
    surface: &mut dyn Surface,
    anomalies: AnomalySet,
    frame: &OverlayFrame,
    rng: &mut dyn RandomSource,
) {
    for anomaly in anomalies.iter() {
        draw_overlay(surface, anomaly, frame, rng);
    }
}

/// Draws the overlay of a single anomaly. "Phase Drift" has none.
pub fn draw_overlay(
    surface: &mut dyn Surface,
    anomaly: Anomaly,
    frame: &OverlayFrame,
    rng: &mut dyn RandomSource,
) {
    match anomaly {
        Anomaly::TachyonLeak => tachyon_leak(surface, frame, rng),
        Anomaly::FluxPinch => flux_pinch(surface, frame, rng),
        Anomaly::PhaseDrift => {}
        Anomaly::EventHorizon => event_horizon(surface, frame),
    }
}

/// Falling white streaks with a square tip, fading as they descend.
fn tachyon_leak(surface: &mut dyn Surface, frame: &OverlayFrame, rng: &mut dyn RandomSource) {
    for j in 0..TACHYON_STREAKS {
        let j = j as f64;
        let phase = (frame.t + j * 0.5).rem_euclid(1.0);
        let x = ((j * 1.5).sin() * 0.5 + 0.5) * frame.size.x;
        let y = phase * frame.size.y;
        let len = rng.next_range(40.0, 100.0);
        let start = DVec2::new(x, y);
        let tip = DVec2::new(x, y + len);
        surface.draw(DrawCommand::StrokePath {
            points: vec![start, tip],
            stroke: Stroke::new(Rgba::WHITE.with_alpha(0.8 * (1.0 - phase)), 2.0),
        });
        surface.draw(DrawCommand::FillRect {
            origin: tip - DVec2::ONE,
            size: DVec2::splat(3.0),
            color: Rgba::WHITE,
        });
    }
}

/// Pulsing ring plus four jittered lightning strokes spinning out of the center.
fn flux_pinch(surface: &mut dyn Surface, frame: &OverlayFrame, rng: &mut dyn RandomSource) {
    let center = frame.center();
    let t = frame.t;
    let alpha = rng.next_range(0.4, 0.8);
    surface.draw(DrawCommand::StrokeCircle {
        center,
        radius: 60.0 + (t * 20.0).sin() * 15.0,
        stroke: Stroke::new(palette::pinch().with_alpha(alpha), 3.0),
    });

    let stroke = Stroke::new(ParticleHue::Entangled.rgba(), 1.0);
    for k in 0..PINCH_STROKES {
        let angle = k as f64 / PINCH_STROKES as f64 * TAU + t * 5.0;
        let heading = DVec2::from_angle(angle) * PINCH_SEGMENT_LENGTH;
        let mut cursor = center;
        let mut points = Vec::with_capacity(PINCH_STROKE_SEGMENTS + 1);
        points.push(cursor);
        for _ in 0..PINCH_STROKE_SEGMENTS {
            let jx = (rng.next_f64() - 0.5) * PINCH_JITTER;
            let jy = (rng.next_f64() - 0.5) * PINCH_JITTER;
            cursor += heading + DVec2::new(jx, jy);
            points.push(cursor);
        }
        surface.draw(DrawCommand::StrokePath { points, stroke });
    }
}

/// Black gradient disc ringed by three rotating amber ellipses.
fn event_horizon(surface: &mut dyn Surface, frame: &OverlayFrame) {
    let center = frame.center();
    let t = frame.t;
    surface.draw(DrawCommand::FillRadialGradient {
        center,
        radius: HORIZON_DISC_RADIUS,
        stops: vec![
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
        ],
    });
    for d in 0..ACCRETION_RINGS {
        let d = d as f64;
        let semi_major = HORIZON_RADIUS * (2.0 + d * 0.5) + (t * 3.0 + d).sin() * 10.0;
        surface.draw(DrawCommand::StrokeEllipse {
            center,
            radii: DVec2::new(semi_major, semi_major * 0.3),
            rotation: t * 1.5 + d,
            stroke: Stroke::new(palette::accretion().with_alpha(0.6 - d * 0.2), 2.0),
        });
    }
}
