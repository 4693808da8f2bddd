#![deny(unsafe_code)]
//! CLI binary for the magnaflux field visualizer.
//!
//! Subcommands:
//! - `render`: run the particle field for N frames, write a PNG snapshot
//! - `list`: print anomalies, interventions and the parameter schema
//!
//! Log output goes through `env_logger`; set `RUST_LOG=debug` for lifecycle
//! detail.

mod error;
mod render;

use clap::{Parser, Subcommand};
use error::CliError;
use magnaflux_core::state::{Anomaly, FieldState, Intervention};
use magnaflux_flux::ReconfigurePolicy;
use render::Overrides;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "magnaflux", about = "Particle and vector-field visualizer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the field for N frames and write a PNG snapshot.
    Render {
        /// Surface width in pixels [default: 800].
        #[arg(short = 'W', long)]
        width: Option<u32>,

        /// Surface height in pixels [default: 600].
        #[arg(short = 'H', long)]
        height: Option<u32>,

        /// Number of frames to run [default: 120].
        #[arg(short, long)]
        frames: Option<usize>,

        /// PRNG seed for deterministic output [default: 42].
        #[arg(long)]
        seed: Option<u64>,

        /// Field state as a JSON object with camelCase keys.
        #[arg(long)]
        state: Option<String>,

        /// Activate an anomaly by name (repeatable), e.g. "Event Horizon".
        #[arg(short, long = "anomaly")]
        anomalies: Vec<String>,

        /// Intervention tag (VECTOR_TRACE, RESONANCE_SCAN, VOID_ANALYSIS, FLUX_GLOW).
        #[arg(short, long)]
        intervention: Option<String>,

        /// Diagnostic report JSON; its visualIntervention is used unless
        /// --intervention is given.
        #[arg(long)]
        report: Option<PathBuf>,

        /// Seed file to replay; command-line flags override its values.
        #[arg(long)]
        seed_file: Option<PathBuf>,

        /// Apply one random drift tick to the field state every N frames.
        #[arg(long)]
        drift_every: Option<usize>,

        /// Keep the particle pool across state changes instead of restarting.
        #[arg(long)]
        live: bool,

        /// Output file path.
        #[arg(short, long, default_value = "magnaflux.png")]
        output: PathBuf,
    },
    /// List anomalies, interventions and field-state parameters.
    List,
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let anomalies: Vec<&str> = Anomaly::ALL.iter().map(|a| a.name()).collect();
            let interventions: Vec<&str> = Intervention::ALL.iter().map(|i| i.tag()).collect();
            let schema = FieldState::param_schema();
            if cli.json {
                let info = serde_json::json!({
                    "anomalies": anomalies,
                    "interventions": interventions,
                    "params": schema,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Anomalies:");
                for name in anomalies {
                    println!("  {name}");
                }
                println!("Interventions:");
                println!("  {}", interventions.join(", "));
                println!("Parameters:");
                if let Some(params) = schema.as_object() {
                    for (key, spec) in params {
                        println!("  {key}: {}", spec["description"].as_str().unwrap_or(""));
                    }
                }
            }
        }
        Command::Render {
            width,
            height,
            frames,
            seed,
            state,
            anomalies,
            intervention,
            report,
            seed_file,
            drift_every,
            live,
            output,
        } => {
            let base = seed_file.as_deref().map(render::load_seed).transpose()?;
            let intervention = match (intervention, report) {
                (Some(tag), _) => Some(tag),
                (None, Some(path)) => {
                    render::load_report(&path)?.map(|tag| tag.tag().to_string())
                }
                (None, None) => None,
            };
            let overrides = Overrides {
                width,
                height,
                frames,
                seed,
                state,
                anomalies,
                intervention,
            };
            let seed = render::resolve_seed(base, &overrides)?;
            let policy = if live {
                ReconfigurePolicy::Live
            } else {
                ReconfigurePolicy::Restart
            };

            let outcome = render::render(&seed, policy, drift_every)?;
            magnaflux_raster::snapshot::write_png(&outcome.raster, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "output": output.display().to_string(),
                    "framesDrawn": outcome.frames_drawn,
                    "particles": outcome.particles,
                    "seed": seed,
                    "state": outcome.state.params(),
                    "hud": outcome.hud,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {}x{} ({} frames, {} particles, seed {}) -> {}",
                    seed.width,
                    seed.height,
                    outcome.frames_drawn,
                    outcome.particles,
                    seed.seed,
                    output.display()
                );
                for line in &outcome.hud {
                    println!("{line}");
                }
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
