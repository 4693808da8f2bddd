#![deny(unsafe_code)]
//! Browser adapter for the magnaflux visualizer.
//!
//! JavaScript owns the `requestAnimationFrame` chain and the resize
//! listener; [`FluxView`] owns everything else. A typical host:
//!
//! ```text
//! const view = new FluxView(canvas.width, canvas.height, 42n, stateJson, tag);
//! function tick() {
//!   if (view.frame()) view.present(canvas);
//!   if (view.running()) requestAnimationFrame(tick);
//! }
//! requestAnimationFrame(tick);
//! ```

use magnaflux_core::error::EngineError;
use magnaflux_core::params::json_type_name;
use magnaflux_core::scheduler::ManualScheduler;
use magnaflux_core::state::{FieldState, Intervention};
use magnaflux_flux::{ControllerConfig, FrameLoop, LoopPhase, ReconfigurePolicy};
use magnaflux_raster::{raster_to_rgba, Raster};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

fn to_js(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parses a host state object. Missing or wrongly-typed keys take their
/// defaults; anything but a JSON object is rejected.
fn parse_state(state_json: &str) -> Result<FieldState, EngineError> {
    let value: Value =
        serde_json::from_str(state_json).map_err(|e| EngineError::ParamTypeMismatch {
            name: "state".into(),
            expected: "object".into(),
            got: format!("unparseable text ({e})"),
        })?;
    if !value.is_object() {
        return Err(EngineError::ParamTypeMismatch {
            name: "state".into(),
            expected: "object".into(),
            got: json_type_name(&value).into(),
        });
    }
    Ok(FieldState::from_json(&value))
}

fn parse_tag(tag: Option<String>) -> Option<Intervention> {
    tag.as_deref().and_then(Intervention::from_tag)
}

/// A mounted visualizer view.
#[wasm_bindgen]
pub struct FluxView {
    frame_loop: FrameLoop<Raster, ManualScheduler>,
}

impl FluxView {
    fn create(
        width: u32,
        height: u32,
        seed: u64,
        state_json: &str,
        tag: Option<String>,
        live: bool,
    ) -> Result<FluxView, EngineError> {
        let config = ControllerConfig {
            seed,
            policy: if live {
                ReconfigurePolicy::Live
            } else {
                ReconfigurePolicy::Restart
            },
        };
        let mut frame_loop = FrameLoop::new(
            Raster::new(width, height),
            ManualScheduler::new(),
            parse_state(state_json)?,
            parse_tag(tag),
            config,
        );
        frame_loop.start()?;
        Ok(FluxView { frame_loop })
    }

    fn apply(&mut self, state_json: &str, tag: Option<String>) -> Result<(), EngineError> {
        let state = parse_state(state_json)?;
        self.frame_loop.reconfigure(state, parse_tag(tag))
    }
}

#[wasm_bindgen]
impl FluxView {
    /// Mounts a view. A zero-sized canvas is fine; the view starts on the
    /// first resize with area.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        seed: u64,
        state_json: &str,
        tag: Option<String>,
        live: bool,
    ) -> Result<FluxView, JsValue> {
        Self::create(width, height, seed, state_json, tag, live).map_err(to_js)
    }

    /// Runs the pending frame. Returns whether anything was drawn.
    pub fn frame(&mut self) -> Result<bool, JsValue> {
        self.frame_loop.pump(1).map(|n| n > 0).map_err(to_js)
    }

    /// Whether the host should keep requesting animation frames.
    pub fn running(&self) -> bool {
        self.frame_loop.phase() == LoopPhase::Running
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.frame_loop.notify_resize(width, height).map_err(to_js)
    }

    /// Hands over a new state object and intervention tag.
    pub fn reconfigure(&mut self, state_json: &str, tag: Option<String>) -> Result<(), JsValue> {
        self.apply(state_json, tag).map_err(to_js)
    }

    pub fn dispose(&mut self) {
        self.frame_loop.dispose();
    }

    /// Status lines, newline-separated.
    pub fn hud(&self) -> String {
        self.frame_loop.hud().join("\n")
    }

    /// Copies the current frame into a 2D canvas.
    pub fn present(&self, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        let raster = self.frame_loop.surface();
        if raster.width() == 0 || raster.height() == 0 {
            return Ok(());
        }
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let rgba = raster_to_rgba(raster);
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(rgba.as_slice()),
            raster.width(),
            raster.height(),
        )?;
        context.put_image_data(&image, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magnaflux_core::state::Anomaly;

    fn view(width: u32, height: u32) -> FluxView {
        FluxView::create(width, height, 7, "{}", None, false).unwrap()
    }

    #[test]
    fn new_view_starts_running() {
        assert!(view(40, 30).running());
    }

    #[test]
    fn zero_sized_view_waits_for_resize() {
        let mut v = view(0, 0);
        assert!(!v.running());
        v.frame_loop.notify_resize(40, 30).unwrap();
        assert!(v.running());
        assert_eq!(v.frame_loop.pump(1).unwrap(), 1);
    }

    #[test]
    fn frames_draw_onto_raster() {
        let mut v = view(40, 30);
        let before = v.frame_loop.surface().pixels().to_vec();
        assert_eq!(v.frame_loop.pump(3).unwrap(), 3);
        assert_ne!(v.frame_loop.surface().pixels(), &before[..]);
    }

    #[test]
    fn dispose_stops_the_view() {
        let mut v = view(40, 30);
        v.dispose();
        assert!(!v.running());
        assert_eq!(v.frame_loop.pump(1).unwrap(), 0);
    }

    #[test]
    fn reconfigure_applies_state_and_tag() {
        let mut v = view(40, 30);
        v.apply(
            r#"{"anomalies": ["Flux Pinch"], "frequency": 9.5}"#,
            Some("VECTOR_TRACE".into()),
        )
        .unwrap();
        assert!(v.frame_loop.state().has(Anomaly::FluxPinch));
        assert_eq!(v.frame_loop.intervention(), Some(Intervention::VectorTrace));
        assert!(v.hud().ends_with("RESONANCE: 9.50 GHz"), "got: {}", v.hud());
    }

    #[test]
    fn unknown_tag_is_ignored() {
        let v = FluxView::create(10, 10, 1, "{}", Some("DISCO".into()), false).unwrap();
        assert_eq!(v.frame_loop.intervention(), None);
    }

    #[test]
    fn non_object_state_is_rejected() {
        let err = parse_state("[1]").err().unwrap();
        assert!(err.to_string().contains("array"), "got: {err}");
        assert!(parse_state("{oops").is_err());
    }
}
