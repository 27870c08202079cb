//! The `adminrun` command line: argument parsing, environment files, the
//! production gate and process exit codes around the script dispatcher.

pub mod app;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod error;
pub mod telemetry;

pub use app::{load_env_files, report, run, write_script_list, Reporter};
pub use cli::{Cli, EnvArg, Invocation};
pub use config::{LogFormat, RunnerConfig};
pub use error::CliError;
