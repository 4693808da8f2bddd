//! The `Engine` trait: one simulation+render step per call.
//!
//! The frame loop in `magnaflux-flux` steps its concrete `Simulation` through
//! this trait. The trait stays object-safe, so a `&mut dyn Engine` works too.

use crate::error::EngineError;
use crate::surface::Surface;
use serde_json::Value;

/// A per-frame visualization.
///
/// Each call to [`step`](Engine::step) advances internal time by one frame
/// and paints the result onto the given surface. The engine never owns the
/// surface; the frame loop does.
///
/// This trait is **object-safe**: you can use `Box<dyn Engine>` or `&dyn Engine`
/// for runtime polymorphism.
pub trait Engine {
    /// Advance the simulation by one frame and draw it.
    ///
    /// Returns an `EngineError` only for conditions the caller must act on
    /// (e.g. a surface with no area). Per-frame numeric guards never fail.
    fn step(&mut self, surface: &mut dyn Surface) -> Result<(), EngineError>;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::surface::{DrawCommand, RecordingSurface};
    use glam::DVec2;
    use serde_json::json;

    /// Minimal engine implementation used to verify trait object safety.
    struct MockEngine {
        step_count: usize,
    }

    impl MockEngine {
        fn new() -> Self {
            Self { step_count: 0 }
        }
    }

    impl Engine for MockEngine {
        fn step(&mut self, surface: &mut dyn Surface) -> Result<(), EngineError> {
            if !surface.is_drawable() {
                return Err(EngineError::InvalidDimensions);
            }
            self.step_count += 1;
            let (w, h) = surface.size();
            surface.draw(DrawCommand::FillRect {
                origin: DVec2::ZERO,
                size: DVec2::new(f64::from(w), f64::from(h)),
                color: Rgba::BLACK,
            });
            Ok(())
        }

        fn params(&self) -> Value {
            json!({"step_count": self.step_count})
        }

        fn param_schema(&self) -> Value {
            json!({
                "step_count": {
                    "type": "integer",
                    "default": 0,
                    "description": "Number of steps executed"
                }
            })
        }
    }

    #[test]
    fn engine_trait_is_object_safe() {
        let mut engine: Box<dyn Engine> = Box::new(MockEngine::new());
        let mut surface = RecordingSurface::new(4, 4);
        engine.step(&mut surface).unwrap();
        assert_eq!(engine.params()["step_count"], 1);
    }

    #[test]
    fn mock_engine_step_draws_onto_surface() {
        let mut engine = MockEngine::new();
        let mut surface = RecordingSurface::new(8, 6);
        engine.step(&mut surface).unwrap();
        engine.step(&mut surface).unwrap();
        assert_eq!(engine.step_count, 2);
        assert_eq!(surface.count("fill_rect"), 2);
    }

    #[test]
    fn mock_engine_rejects_empty_surface() {
        let mut engine = MockEngine::new();
        let mut surface = RecordingSurface::new(0, 0);
        let err = engine.step(&mut surface).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDimensions));
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn mock_engine_param_schema_has_expected_structure() {
        let engine = MockEngine::new();
        let schema = engine.param_schema();
        assert!(schema.get("step_count").is_some());
        assert_eq!(schema["step_count"]["type"], "integer");
    }

    #[test]
    fn dyn_engine_mut_reference_works() {
        let mut engine = MockEngine::new();
        let mut surface = RecordingSurface::new(2, 2);
        let engine_ref: &mut dyn Engine = &mut engine;
        engine_ref.step(&mut surface).unwrap();
        assert_eq!(engine_ref.params()["step_count"], 1);
    }
}
