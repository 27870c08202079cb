//! One invocation of the runner, from parsed arguments to a result.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use adminrun_core::environment::Environment;
use adminrun_core::input::{ValidationError, ViolationKind};
use adminrun_db::{PgConnectionManager, PgConnector, TomlCredentialFile};
use adminrun_scripts::builtin::builtin_registry;
use adminrun_scripts::{Dispatcher, RunError};
use serde_json::Value;

use crate::cli::Invocation;
use crate::config::RunnerConfig;
use crate::confirm::confirm_production;
use crate::error::CliError;

/// Load `.env.<env>` then `.env` from the working directory. Variables that
/// are already set win, so the tier file takes precedence over the shared
/// one. Missing files are skipped; the paths that were loaded are returned.
pub fn load_env_files(environment: Environment) -> Result<Vec<PathBuf>, CliError> {
    let mut loaded = Vec::new();
    for name in [environment.env_file_name(), ".env".to_string()] {
        match dotenvy::from_filename(&name) {
            Ok(path) => loaded.push(path),
            Err(err) if err.not_found() => {}
            Err(source) => return Err(CliError::EnvFile { path: name, source }),
        }
    }
    Ok(loaded)
}

/// Write every registered script identifier, one per line.
pub fn write_script_list(mut output: impl Write) -> Result<(), CliError> {
    let registry = builtin_registry()?;
    for identifier in registry.identifiers() {
        writeln!(output, "{identifier}")?;
    }
    Ok(())
}

/// Run `invocation` against the built-in registry.
///
/// A production run asks for confirmation on `prompt_in`/`prompt_out` first
/// and returns [`CliError::Aborted`] without touching the registry or any
/// database unless it is given. Open connections are closed before returning,
/// whatever the outcome.
pub async fn run(
    invocation: &Invocation,
    config: &RunnerConfig,
    prompt_in: impl BufRead,
    prompt_out: impl Write,
) -> Result<(), CliError> {
    let environment = invocation.environment;

    if environment.requires_confirmation() && !confirm_production(&invocation.script, prompt_in, prompt_out)? {
        tracing::warn!(script = %invocation.script, "Production run declined");
        return Err(CliError::Aborted);
    }

    let args = parse_args(&invocation.args)?;
    let registry = builtin_registry()?;
    let credentials = Arc::new(TomlCredentialFile::new(config.credentials_dir.clone()));
    let db = PgConnectionManager::new(environment, credentials, PgConnector::default());

    let result = Dispatcher::new(&registry, &db)
        .run(environment, &invocation.script, &args)
        .await;
    db.shutdown().await;

    result.map_err(CliError::from)
}

/// Where the final error is reported: plain stderr until the subscriber is
/// installed, the log afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reporter {
    Stderr,
    Tracing,
}

/// Report the outcome once and return the process exit code.
pub fn report(result: Result<(), CliError>, reporter: Reporter, mut stderr: impl Write) -> u8 {
    let Err(err) = result else {
        return 0;
    };
    match reporter {
        Reporter::Stderr => {
            // Nothing is left to report a failed stderr write to.
            let _ = writeln!(stderr, "error: {err}");
        }
        Reporter::Tracing => tracing::error!(exit_code = err.exit_code(), "{err}"),
    }
    err.exit_code()
}

/// `--args` must be a JSON object.
fn parse_args(raw: &str) -> Result<Value, RunError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        ValidationError::single("", ViolationKind::NotAnObject, format!("--args is not valid JSON: {e}"))
    })?;

    if !value.is_object() {
        return Err(ValidationError::single(
            "",
            ViolationKind::NotAnObject,
            "--args must be a JSON object",
        )
        .into());
    }
    Ok(value)
}
