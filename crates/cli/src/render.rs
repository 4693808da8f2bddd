//! Headless render job: resolves a [`Seed`] from the command line and runs
//! the frame loop against a CPU raster.

use magnaflux_core::prng::Xorshift64;
use magnaflux_core::report::DiagnosticReport;
use magnaflux_core::scheduler::ManualScheduler;
use magnaflux_core::seed::Seed;
use magnaflux_core::state::{Anomaly, FieldState, Intervention};
use magnaflux_flux::{ControllerConfig, FrameLoop, ReconfigurePolicy};
use magnaflux_raster::Raster;
use serde_json::Value;
use std::path::Path;

use crate::error::CliError;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_FRAMES: usize = 120;

// keeps drift independent of the particle stream forked from the same seed
const DRIFT_STREAM: u64 = 0xD81F_7A11_0C3E_55A9;

/// Command-line overrides layered on top of an optional seed file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frames: Option<usize>,
    pub seed: Option<u64>,
    pub state: Option<String>,
    pub anomalies: Vec<String>,
    pub intervention: Option<String>,
}

/// Everything a finished render hands back to the caller.
pub struct RenderOutcome {
    pub raster: Raster,
    pub frames_drawn: usize,
    pub particles: usize,
    pub state: FieldState,
    pub hud: Vec<String>,
}

/// Reads and parses a seed file.
pub fn load_seed(path: &Path) -> Result<Seed, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read seed file {}: {e}", path.display())))?;
    Ok(Seed::from_json_str(&text)?)
}

/// Reads a diagnostic report and returns its intervention tag, if any.
pub fn load_report(path: &Path) -> Result<Option<Intervention>, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read report {}: {e}", path.display())))?;
    let report: DiagnosticReport = serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid report {}: {e}", path.display())))?;
    Ok(report.intervention())
}

/// Layers `overrides` on top of `base`. Flags win over the seed file, the
/// seed file wins over the defaults. State keys from `--state` replace the
/// same keys in the file's params; `--anomaly` names are added to its list.
pub fn resolve_seed(base: Option<Seed>, overrides: &Overrides) -> Result<Seed, CliError> {
    let mut seed = base.unwrap_or_else(|| {
        let mut s = Seed::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, ControllerConfig::default().seed);
        s.frames = DEFAULT_FRAMES;
        s
    });
    if seed.frames == 0 {
        seed.frames = DEFAULT_FRAMES;
    }
    seed.width = overrides.width.unwrap_or(seed.width);
    seed.height = overrides.height.unwrap_or(seed.height);
    seed.frames = overrides.frames.unwrap_or(seed.frames);
    seed.seed = overrides.seed.unwrap_or(seed.seed);

    let Value::Object(params) = &mut seed.params else {
        return Err(CliError::Input("seed params must be a JSON object".into()));
    };
    if let Some(text) = &overrides.state {
        let state: Value = serde_json::from_str(text)
            .map_err(|e| CliError::Input(format!("invalid --state JSON: {e}")))?;
        let Value::Object(fields) = state else {
            return Err(CliError::Input("--state must be a JSON object".into()));
        };
        params.extend(fields);
    }
    if !overrides.anomalies.is_empty() {
        let mut names: Vec<Value> = match params.remove("anomalies") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        for name in &overrides.anomalies {
            if Anomaly::from_name(name).is_none() {
                return Err(CliError::Input(format!(
                    "unknown anomaly '{name}' (expected one of: {})",
                    Anomaly::ALL.map(Anomaly::name).join(", ")
                )));
            }
            names.push(Value::String(name.clone()));
        }
        params.insert("anomalies".into(), Value::Array(names));
    }

    if let Some(tag) = &overrides.intervention {
        if Intervention::from_tag(tag).is_none() {
            return Err(CliError::Input(format!(
                "unknown intervention '{tag}' (expected one of: {})",
                Intervention::ALL.map(Intervention::tag).join(", ")
            )));
        }
        seed.intervention = Some(tag.clone());
    }
    seed.validate()?;
    Ok(seed)
}

/// Runs `seed.frames` frames and returns the final raster.
///
/// With `drift_every = Some(n)` the field state takes one drift tick every
/// `n` frames and is handed back through `reconfigure`, so `policy` decides
/// whether the pool survives the change.
pub fn render(
    seed: &Seed,
    policy: ReconfigurePolicy,
    drift_every: Option<usize>,
) -> Result<RenderOutcome, CliError> {
    seed.validate()?;
    let tag = seed.intervention();
    let config = ControllerConfig {
        seed: seed.seed,
        policy,
    };
    let mut frame_loop = FrameLoop::new(
        Raster::new(seed.width, seed.height),
        ManualScheduler::new(),
        seed.state(),
        tag,
        config,
    );
    frame_loop.start()?;

    let mut drift_rng = Xorshift64::new(seed.seed ^ DRIFT_STREAM);
    let drift_every = drift_every.filter(|&n| n > 0);
    let mut frames_drawn = 0;
    for frame in 1..=seed.frames {
        frames_drawn += frame_loop.pump(1)?;
        if let Some(every) = drift_every {
            if frame % every == 0 && frame < seed.frames {
                let next = frame_loop.state().drift(&mut drift_rng);
                frame_loop.reconfigure(next, tag)?;
            }
        }
    }

    let particles = frame_loop
        .simulation()
        .map_or(0, |sim| sim.particles().len());
    let hud = frame_loop.hud();
    let state = *frame_loop.state();
    log::info!("rendered {frames_drawn} frames with {particles} particles");
    Ok(RenderOutcome {
        raster: frame_loop.into_surface(),
        frames_drawn,
        particles,
        state,
        hud,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn small(frames: usize) -> Overrides {
        Overrides {
            width: Some(64),
            height: Some(48),
            frames: Some(frames),
            ..Overrides::default()
        }
    }

    // ── seed resolution ──

    #[test]
    fn defaults_without_seed_file() {
        let seed = resolve_seed(None, &Overrides::default()).unwrap();
        assert_eq!((seed.width, seed.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(seed.frames, DEFAULT_FRAMES);
        assert_eq!(seed.seed, 42);
        assert!(seed.intervention.is_none());
    }

    #[test]
    fn flags_override_seed_file() {
        let mut base = Seed::new(320, 240, 7);
        base.frames = 30;
        base.params = json!({"intensity": 10, "frequency": 2.0});
        let overrides = Overrides {
            width: Some(100),
            state: Some(r#"{"intensity": 90}"#.into()),
            ..Overrides::default()
        };
        let seed = resolve_seed(Some(base), &overrides).unwrap();
        assert_eq!((seed.width, seed.height), (100, 240));
        assert_eq!(seed.frames, 30);
        assert_eq!(seed.seed, 7);
        let state = seed.state();
        assert_eq!(state.intensity, 90.0);
        assert_eq!(state.frequency, 2.0);
    }

    #[test]
    fn anomaly_flags_extend_seed_list() {
        let mut base = Seed::new(10, 10, 1);
        base.params = json!({"anomalies": ["Event Horizon"]});
        let overrides = Overrides {
            anomalies: vec!["Flux Pinch".into()],
            ..Overrides::default()
        };
        let state = resolve_seed(Some(base), &overrides).unwrap().state();
        assert!(state.has(Anomaly::EventHorizon));
        assert!(state.has(Anomaly::FluxPinch));
    }

    #[test]
    fn unknown_anomaly_is_input_error() {
        let overrides = Overrides {
            anomalies: vec!["Wormhole".into()],
            ..Overrides::default()
        };
        let err = resolve_seed(None, &overrides).unwrap_err();
        assert_eq!(err.exit_code(), 12);
        assert!(err.to_string().contains("Wormhole"), "got: {err}");
    }

    #[test]
    fn unknown_intervention_is_input_error() {
        let overrides = Overrides {
            intervention: Some("LASER_SHOW".into()),
            ..Overrides::default()
        };
        let err = resolve_seed(None, &overrides).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn non_object_state_is_input_error() {
        let overrides = Overrides {
            state: Some("[1, 2]".into()),
            ..Overrides::default()
        };
        assert_eq!(resolve_seed(None, &overrides).unwrap_err().exit_code(), 12);
    }

    #[test]
    fn zero_width_is_engine_error() {
        let overrides = Overrides {
            width: Some(0),
            ..Overrides::default()
        };
        assert_eq!(resolve_seed(None, &overrides).unwrap_err().exit_code(), 10);
    }

    // ── files ──

    #[test]
    fn load_seed_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"width": 32, "height": 16, "seed": 9, "frames": 5}}"#).unwrap();
        let seed = load_seed(file.path()).unwrap();
        assert_eq!((seed.width, seed.height, seed.seed, seed.frames), (32, 16, 9, 5));
    }

    #[test]
    fn load_seed_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_seed(&dir.path().join("nope.json")).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn load_seed_garbage_is_engine_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert_eq!(load_seed(file.path()).unwrap_err().exit_code(), 10);
    }

    #[test]
    fn load_report_extracts_intervention() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let report = json!({
            "timestamp": "2026-01-01T00:00:00Z",
            "summary": "s",
            "recommendation": "r",
            "riskLevel": "Critical",
            "visualIntervention": "VOID_ANALYSIS"
        });
        write!(file, "{report}").unwrap();
        assert_eq!(
            load_report(file.path()).unwrap(),
            Some(Intervention::VoidAnalysis)
        );
    }

    #[test]
    fn load_report_malformed_is_input_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"summary": 3}}"#).unwrap();
        assert_eq!(load_report(file.path()).unwrap_err().exit_code(), 12);
    }

    // ── rendering ──

    #[test]
    fn render_draws_every_frame() {
        let seed = resolve_seed(None, &small(12)).unwrap();
        let out = render(&seed, ReconfigurePolicy::Restart, None).unwrap();
        assert_eq!(out.frames_drawn, 12);
        assert_eq!(out.particles, seed.state().pool_size());
        assert_eq!((out.raster.width(), out.raster.height()), (64, 48));
    }

    #[test]
    fn render_is_deterministic_for_a_seed() {
        let seed = resolve_seed(None, &small(8)).unwrap();
        let a = render(&seed, ReconfigurePolicy::Restart, None).unwrap();
        let b = render(&seed, ReconfigurePolicy::Restart, None).unwrap();
        assert_eq!(a.raster.pixels(), b.raster.pixels());
    }

    #[test]
    fn drift_changes_state_and_keeps_drawing() {
        let seed = resolve_seed(None, &small(10)).unwrap();
        let out = render(&seed, ReconfigurePolicy::Live, Some(2)).unwrap();
        assert_eq!(out.frames_drawn, 10);
        assert_ne!(out.state, seed.state());
    }

    #[test]
    fn zero_drift_interval_is_ignored() {
        let seed = resolve_seed(None, &small(4)).unwrap();
        let out = render(&seed, ReconfigurePolicy::Restart, Some(0)).unwrap();
        assert_eq!(out.state, seed.state());
    }

    #[test]
    fn hud_lists_intervention_and_anomalies() {
        let overrides = Overrides {
            anomalies: vec!["Tachyon Leak".into()],
            intervention: Some("FLUX_GLOW".into()),
            ..small(2)
        };
        let seed = resolve_seed(None, &overrides).unwrap();
        let out = render(&seed, ReconfigurePolicy::Restart, None).unwrap();
        assert_eq!(out.hud[0], "AI_INTERVENTION: FLUX_GLOW");
        assert!(out.hud.iter().any(|l| l == "CRITICAL DETECTION: TACHYON LEAK"));
    }
}
