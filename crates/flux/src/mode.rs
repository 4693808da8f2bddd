//! Intervention render mode.
//!
//! The diagnostic collaborator may hand over an [`Intervention`] tag. It is
//! re-read every frame and only changes how things are drawn, never how
//! particles move:
//!
//! | tag              | effect                                         |
//! |------------------|------------------------------------------------|
//! | `VECTOR_TRACE`   | particles drawn as velocity streaks            |
//! | `RESONANCE_SCAN` | expanding purple ring from the center          |
//! | `VOID_ANALYSIS`  | heavier background fade, brighter grid         |
//! | `FLUX_GLOW`      | glow halo on every particle                    |

use glam::DVec2;
use magnaflux_core::palette;
use magnaflux_core::state::{FieldState, Intervention};
use magnaflux_core::surface::{DrawCommand, Glow, Stroke, Surface};

use crate::particle::Particle;

/// Fade alpha floor without `VOID_ANALYSIS`.
pub const BASE_ALPHA: f64 = 0.08;
/// Fade alpha floor under `VOID_ANALYSIS`.
pub const VOID_BASE_ALPHA: f64 = 0.4;
/// Entanglement above which particles glow regardless of tag.
pub const GLOW_THRESHOLD: f64 = 80.0;
/// Blur radius of the particle glow halo.
pub const GLOW_BLUR: f64 = 10.0;
/// Expansion speed of the resonance ring, px per unit of field time.
pub const SCAN_SPEED: f64 = 500.0;
/// Trail length under `VECTOR_TRACE`, in frames of velocity.
const TRACE_FRAMES: f64 = 10.0;
const GRID_ALPHA: f64 = 0.05;
const VOID_GRID_ALPHA: f64 = 0.15;
const SCAN_ALPHA: f64 = 0.2;

/// How the current frame is drawn, derived from the optional tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderMode {
    tag: Option<Intervention>,
}

impl RenderMode {
    pub fn new(tag: Option<Intervention>) -> Self {
        Self { tag }
    }

    pub fn tag(&self) -> Option<Intervention> {
        self.tag
    }

    fn is(&self, tag: Intervention) -> bool {
        self.tag == Some(tag)
    }

    pub fn base_alpha(&self) -> f64 {
        if self.is(Intervention::VoidAnalysis) {
            VOID_BASE_ALPHA
        } else {
            BASE_ALPHA
        }
    }

    /// Alpha of the background wash: `max(base, 0.2 - energy/1000)`.
    pub fn fade_alpha(&self, state: &FieldState) -> f64 {
        self.base_alpha().max(0.2 - state.energy_level / 1000.0)
    }

    pub fn grid_alpha(&self) -> f64 {
        if self.is(Intervention::VoidAnalysis) {
            VOID_GRID_ALPHA
        } else {
            GRID_ALPHA
        }
    }

    /// Whether particles get a glow halo this frame.
    pub fn glows(&self, state: &FieldState) -> bool {
        state.entanglement > GLOW_THRESHOLD || self.is(Intervention::FluxGlow)
    }

    /// Radius of the resonance ring at time `t`, if the scan is active.
    pub fn scan_radius(&self, t: f64, width: f64) -> Option<f64> {
        if !self.is(Intervention::ResonanceScan) || width <= 0.0 {
            return None;
        }
        Some((t * SCAN_SPEED).rem_euclid(width))
    }

    /// Draws one particle: a velocity streak under `VECTOR_TRACE`, otherwise
    /// a disc. Either is haloed when [`glows`](Self::glows).
    pub fn draw_particle(&self, surface: &mut dyn Surface, p: &Particle, state: &FieldState) {
        let radius = particle_radius(state);
        let color = p.hue.rgba();
        let glow = self.glows(state).then_some(Glow {
            color,
            blur: GLOW_BLUR,
        });
        if self.is(Intervention::VectorTrace) {
            surface.draw(DrawCommand::StrokePath {
                points: vec![p.pos - p.vel * TRACE_FRAMES, p.pos],
                stroke: Stroke::new(color, radius).with_glow(glow),
            });
        } else {
            surface.draw(DrawCommand::FillDisc {
                center: p.pos,
                radius,
                color,
                glow,
            });
        }
    }

    /// Draws the resonance ring, if active.
    pub fn draw_scan(&self, surface: &mut dyn Surface, size: DVec2, t: f64) {
        if let Some(radius) = self.scan_radius(t, size.x) {
            surface.draw(DrawCommand::StrokeCircle {
                center: size * 0.5,
                radius,
                stroke: Stroke::new(palette::scan().with_alpha(SCAN_ALPHA), 1.0),
            });
        }
    }
}

/// Disc radius, also the streak width: `1.2 + energy/200`.
pub fn particle_radius(state: &FieldState) -> f64 {
    1.2 + state.energy_level / 200.0
}
