//! One running visualization: particle pool, field time and randomness.
//!
//! A [`Simulation`] is created from a field-state snapshot and lives until
//! the frame loop restarts or is disposed. Each [`Engine::step`] advances
//! field time by a fixed amount and paints one full frame in this order:
//! background fade, particles, resonance ring, grid, anomaly overlays.

use glam::DVec2;
use magnaflux_core::engine::Engine;
use magnaflux_core::error::EngineError;
use magnaflux_core::prng::RandomSource;
use magnaflux_core::state::{Anomaly, FieldState, Intervention};
use magnaflux_core::surface::Surface;
use serde_json::{json, Value};

use crate::integrator::{integrate, StepOutcome};
use crate::mode::RenderMode;
use crate::overlay::{draw_overlays, OverlayFrame};
use crate::particle::ParticleStore;
use crate::scene::{draw_fade, draw_grid};

/// Field time advanced per frame at fluctuation 50.
const TIME_STEP_AT_HALF: f64 = 0.01;

/// Field time advanced per frame: `0.01 * fluctuation / 50`.
pub fn time_step(state: &FieldState) -> f64 {
    TIME_STEP_AT_HALF * (state.fluctuation / 50.0)
}

fn surface_size(surface: &dyn Surface) -> Result<DVec2, EngineError> {
    if !surface.is_drawable() {
        return Err(EngineError::InvalidDimensions);
    }
    let (w, h) = surface.size();
    Ok(DVec2::new(f64::from(w), f64::from(h)))
}

/// The particle/vector-field visualization.
pub struct Simulation {
    state: FieldState,
    mode: RenderMode,
    particles: ParticleStore,
    rng: Box<dyn RandomSource>,
    t: f64,
    frames: u64,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("particles", &self.particles.len())
            .field("t", &self.t)
            .field("frames", &self.frames)
            .finish()
    }
}

impl Simulation {
    /// Starts a simulation on a `width` x `height` surface.
    ///
    /// The state is sanitized once here; the pool is sized from its
    /// intensity and never resized afterwards.
    ///
    /// Returns `EngineError::InvalidDimensions` if width or height is zero.
    pub fn new(
        state: &FieldState,
        tag: Option<Intervention>,
        width: u32,
        height: u32,
        mut rng: Box<dyn RandomSource>,
    ) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let state = state.sanitized();
        let size = DVec2::new(f64::from(width), f64::from(height));
        let particles = ParticleStore::populate(state.pool_size(), size, &state, rng.as_mut());
        Ok(Self {
            state,
            mode: RenderMode::new(tag),
            particles,
            rng,
            t: 0.0,
            frames: 0,
        })
    }

    /// The sanitized state the simulation runs on.
    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn intervention(&self) -> Option<Intervention> {
        self.mode.tag()
    }

    /// Accumulated field time.
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Frames stepped so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    /// Swaps in a new state and tag without touching the pool or time.
    pub fn set_state(&mut self, state: &FieldState, tag: Option<Intervention>) {
        self.state = state.sanitized();
        self.mode = RenderMode::new(tag);
    }

    /// Status lines shown over the view.
    ///
    /// The intervention label (if any), one detection line per active
    /// anomaly, then the resonance readout.
    pub fn hud(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(tag) = self.mode.tag() {
            lines.push(format!("AI_INTERVENTION: {tag}"));
        }
        lines.extend(
            self.state
                .anomalies
                .iter()
                .map(|a: Anomaly| format!("CRITICAL DETECTION: {}", a.name().to_uppercase())),
        );
        lines.push(format!("RESONANCE: {:.2} GHz", self.state.frequency));
        lines
    }

    fn step_particles(&mut self, surface: &mut dyn Surface, size: DVec2) {
        for i in 0..self.particles.len() {
            let Some(p) = self.particles.get_mut(i) else {
                break;
            };
            let outcome = integrate(p, self.t, &self.state, size);
            if outcome == StepOutcome::Unstable {
                log::warn!("particle {i} went non-finite at t={:.3}; replacing", self.t);
            }
            if outcome.needs_respawn() {
                self.particles.respawn(i, size, &self.state, self.rng.as_mut());
            }
            if let Some(p) = self.particles.get(i) {
                self.mode.draw_particle(surface, p, &self.state);
            }
        }
    }
}

impl Engine for Simulation {
    fn step(&mut self, surface: &mut dyn Surface) -> Result<(), EngineError> {
        let size = surface_size(surface)?;
        self.t += time_step(&self.state);
        self.frames += 1;

        draw_fade(surface, size, &self.state, &self.mode);
        self.step_particles(surface, size);
        self.mode.draw_scan(surface, size, self.t);
        draw_grid(surface, size, &self.state, &self.mode);
        let frame = OverlayFrame { size, t: self.t };
        draw_overlays(surface, self.state.anomalies, &frame, self.rng.as_mut());
        Ok(())
    }

    fn params(&self) -> Value {
        let mut params = self.state.params();
        if let Some(obj) = params.as_object_mut() {
            obj.insert(
                "intervention".to_string(),
                self.mode.tag().map_or(Value::Null, |t| json!(t.tag())),
            );
        }
        params
    }

    fn param_schema(&self) -> Value {
        let mut schema = FieldState::param_schema();
        if let Some(obj) = schema.as_object_mut() {
            obj.insert(
                "intervention".to_string(),
                json!({
                    "type": ["string", "null"],
                    "enum": Intervention::ALL.iter().map(|i| i.tag()).collect::<Vec<_>>(),
                    "default": null,
                    "description": "Render-mode tag from the diagnostic report; unknown tags are ignored",
                }),
            );
        }
        schema
    }
}
