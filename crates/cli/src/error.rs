//! Failures of the `magnaflux` binary and the exit code each one maps to.
//!
//! | code | meaning |
//! |------|---------|
//! | 0    | success |
//! | 2    | argument parsing, reported by clap before `run` starts |
//! | 10   | the render could not run: zero or overflowing size, unreadable seed file |
//! | 11   | a seed file, report or snapshot path could not be read or written |
//! | 12   | a flag value was rejected: unknown anomaly or intervention, bad `--state`, bad report |
//! | 13   | the `--json` summary could not be produced |

use magnaflux_core::EngineError;
use std::fmt;

pub enum CliError {
    /// Rejected by the visualizer itself.
    Engine(EngineError),
    /// Filesystem failure, message includes the path.
    Io(String),
    /// A command-line value that names nothing or does not parse.
    Input(String),
    /// JSON summary output failed.
    Serialization(String),
}

impl CliError {
    /// Process exit code, see the module table.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                f.write_str(msg)
            }
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CliError({}): {self}", self.exit_code())
    }
}

/// Snapshot write failures arrive as `EngineError::Io` and keep exit code 11.
impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => CliError::Io(msg),
            other => CliError::Engine(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
