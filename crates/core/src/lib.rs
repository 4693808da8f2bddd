#![deny(unsafe_code)]
//! Core types and traits for the magnaflux field visualizer.
//!
//! Provides the `Engine` trait, the `FieldState` snapshot with its anomaly and
//! intervention vocabulary, the flux `FieldSource`, the `Surface`/`DrawCommand`
//! drawing model, the `FrameScheduler` host hooks, `Rgba` colors and palette,
//! the `Xorshift64` PRNG, `Seed`, and parameter helpers.

pub mod color;
pub mod engine;
pub mod error;
pub mod field_source;
pub mod palette;
pub mod params;
pub mod prng;
pub mod report;
pub mod scheduler;
pub mod seed;
pub mod state;
pub mod surface;

pub use color::Rgba;
pub use engine::Engine;
pub use error::EngineError;
pub use field_source::{FieldSource, FluxField};
pub use palette::ParticleHue;
pub use prng::{FixedSequence, RandomSource, Xorshift64};
pub use report::DiagnosticReport;
pub use scheduler::{FrameScheduler, FrameToken, ListenerId, ManualScheduler};
pub use seed::Seed;
pub use state::{Anomaly, AnomalySet, FieldState, Intervention};
pub use surface::{DrawCommand, GradientStop, Glow, RecordingSurface, Stroke, Surface};
