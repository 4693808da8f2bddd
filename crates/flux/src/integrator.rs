//! Per-particle, per-frame motion step.
//!
//! Each frame a particle picks up the flux field force, then the additive
//! anomaly forces ("Event Horizon" pull and absorption, "Flux Pinch"
//! vortex), is damped once, moves, ages by half a life unit, and wraps
//! toroidally back onto the surface. The caller replaces it when the step
//! reports anything but [`StepOutcome::Alive`].

use glam::DVec2;
use magnaflux_core::field_source::sample;
use magnaflux_core::state::{Anomaly, FieldState};

use crate::particle::Particle;

/// Absorption distance of the event horizon.
pub const HORIZON_RADIUS: f64 = 40.0;
/// Distance within which the horizon pulls particles inward.
pub const HORIZON_PULL_RADIUS: f64 = 250.0;
const HORIZON_PULL_DIVISOR: f64 = 400.0;

/// Distance within which the pinch vortex acts.
pub const PINCH_RADIUS: f64 = 150.0;
const PINCH_PULL_DIVISOR: f64 = 100.0;
const PINCH_SWIRL_DIVISOR: f64 = 50.0;

/// Velocity multiplier applied once per step, after all forces.
pub const DAMPING: f64 = 0.95;
/// Life lost per step.
pub const LIFE_DECAY: f64 = 0.5;

/// What happened to a particle during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Still alive and on the surface.
    Alive,
    /// Life ran out.
    Expired,
    /// Crossed the horizon; life is exactly 0.
    Absorbed,
    /// Position, velocity or life became non-finite.
    Unstable,
}

impl StepOutcome {
    /// Whether the slot must be refilled with a fresh particle.
    pub fn needs_respawn(self) -> bool {
        self != StepOutcome::Alive
    }
}

/// Scale applied to the field force: `0.1 * (1 + energy/100)`.
pub fn acceleration(state: &FieldState) -> f64 {
    0.1 * (1.0 + state.energy_level / 100.0)
}

/// Wraps `value` into `[0, extent)`.
///
/// `rem_euclid` can round up to exactly `extent` for tiny negative inputs;
/// that case folds to 0.
pub fn wrap(value: f64, extent: f64) -> f64 {
    let w = value.rem_euclid(extent);
    if w >= extent {
        0.0
    } else {
        w
    }
}

/// Advances `p` one step at field time `t` on a surface of `size`.
///
/// `state` must already be sanitized. `size` must be non-zero on both axes.
pub fn integrate(p: &mut Particle, t: f64, state: &FieldState, size: DVec2) -> StepOutcome {
    let (fx, fy) = sample(p.pos.x, p.pos.y, t, state);
    p.vel += DVec2::new(fx, fy) * acceleration(state);

    let center = size * 0.5;
    let to_center = center - p.pos;
    let dist = to_center.length();

    let mut absorbed = false;
    if state.has(Anomaly::EventHorizon) {
        if dist < HORIZON_PULL_RADIUS {
            p.vel += to_center * ((HORIZON_PULL_RADIUS - dist) / HORIZON_PULL_DIVISOR);
        }
        absorbed = dist < HORIZON_RADIUS;
    }

    if state.has(Anomaly::FluxPinch) && dist < PINCH_RADIUS {
        let pull = (PINCH_RADIUS - dist) / PINCH_PULL_DIVISOR;
        let swirl = (PINCH_RADIUS - dist) / PINCH_SWIRL_DIVISOR;
        // swirl is perpendicular to the radial pull
        p.vel += to_center * pull - to_center.perp() * swirl;
    }

    p.vel *= DAMPING;
    p.pos += p.vel;

    if absorbed {
        p.life = 0.0;
    } else {
        p.life -= LIFE_DECAY;
    }

    if !p.is_finite() {
        return StepOutcome::Unstable;
    }

    p.pos = DVec2::new(wrap(p.pos.x, size.x), wrap(p.pos.y, size.y));

    if absorbed {
        StepOutcome::Absorbed
    } else if p.life <= 0.0 {
        StepOutcome::Expired
    } else {
        StepOutcome::Alive
    }
}
