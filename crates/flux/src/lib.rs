#![deny(unsafe_code)]
//! Particle and vector-field visualization for magnaflux.
//!
//! A fixed pool of particles is pushed around by the flux field and by
//! anomaly forces, then drawn with background fade, lensed grid, intervention
//! effects and anomaly overlays. [`FrameLoop`] drives a [`Simulation`] one
//! frame per host callback.

pub mod frame_loop;
pub mod integrator;
pub mod mode;
pub mod overlay;
pub mod particle;
pub mod scene;
pub mod simulation;

pub use frame_loop::{ControllerConfig, FrameLoop, LoopPhase, ReconfigurePolicy};
pub use integrator::{integrate, StepOutcome, HORIZON_RADIUS};
pub use mode::RenderMode;
pub use particle::{Particle, ParticleStore};
pub use simulation::Simulation;
