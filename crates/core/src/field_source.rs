//! The flux vector field: force direction and magnitude at any point in time.
//!
//! A [`FieldSource`] produces an (fx, fy) force vector at any point in space
//! and time. [`FluxField`] is the one the visualizer uses: a product of sines
//! over screen space, rotated by spin and modulated by "Phase Drift".
//!
//! All implementations are pure: same inputs produce bit-identical output.

use std::f64::consts::{PI, TAU};

use crate::state::{Anomaly, FieldState};

/// Base spatial frequency of the field, per pixel.
pub const BASE_SCALE: f64 = 0.005;
/// Amplitude of the spatial-scale oscillation under "Phase Drift".
pub const DRIFT_SCALE_AMPLITUDE: f64 = 0.002;
/// Amplitude of the angular wobble under "Phase Drift".
pub const DRIFT_ANGLE_AMPLITUDE: f64 = 0.5;

/// A source of 2D force vectors.
///
/// Returns an (fx, fy) vector at any point in space and time.
/// Implementations must be deterministic: same inputs = same output.
pub trait FieldSource: Send + Sync {
    fn sample(&self, x: f64, y: f64, time: f64) -> (f64, f64);
}

/// The flux field for one [`FieldState`].
///
/// Holds nothing but a borrow of the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct FluxField<'a> {
    state: &'a FieldState,
}

impl<'a> FluxField<'a> {
    pub fn new(state: &'a FieldState) -> Self {
        Self { state }
    }
}

impl FieldSource for FluxField<'_> {
    fn sample(&self, x: f64, y: f64, time: f64) -> (f64, f64) {
        sample(x, y, time, self.state)
    }
}

/// Force magnitude, independent of position: `(intensity/20) * (1 + energy/200)`.
pub fn magnitude(state: &FieldState) -> f64 {
    (state.intensity / 20.0) * (1.0 + state.energy_level / 200.0)
}

/// Field direction in radians at `(x, y)` and time `t`.
pub fn angle(x: f64, y: f64, t: f64, state: &FieldState) -> f64 {
    let drifting = state.has(Anomaly::PhaseDrift);
    let scale = if drifting {
        BASE_SCALE + (t * 0.5).sin() * DRIFT_SCALE_AMPLITUDE
    } else {
        BASE_SCALE
    };
    let spin_offset = (state.particle_spin / 10.0) * PI;
    let mut angle = (x * scale + t).sin() * (y * scale + t).cos() * TAU * (state.frequency / 10.0)
        + spin_offset;
    if drifting {
        angle += (t * 2.0).sin() * DRIFT_ANGLE_AMPLITUDE;
    }
    angle
}

/// Samples the flux field: `(cos(angle) * magnitude, sin(angle) * magnitude)`.
pub fn sample(x: f64, y: f64, t: f64, state: &FieldState) -> (f64, f64) {
    let a = angle(x, y, t, state);
    let m = magnitude(state);
    (a.cos() * m, a.sin() * m)
}
