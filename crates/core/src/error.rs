//! Error types for the magnaflux core.

use thiserror::Error;

/// Errors produced by visualizer operations.
///
/// Per-frame simulation guards (non-finite state, unknown anomaly names,
/// zero-sized surfaces) never produce these; they clamp, skip or replace.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A parameter existed but had the wrong JSON type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// A seed file could not be parsed.
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    /// Writing a snapshot or reading an input file failed.
    #[error("i/o error: {0}")]
    Io(String),
}
