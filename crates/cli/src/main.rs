//! `adminrun` -- run one registered administrative script.
//!
//! ```text
//! adminrun --env dev update-user --args '{"user_id": 7, "is_active": false}'
//! adminrun --list
//! ```
//!
//! # Environment variables
//!
//! | Variable                   | Default  | Description                            |
//! |----------------------------|----------|----------------------------------------|
//! | `ADMINRUN_CREDENTIALS_DIR` | `config` | Directory of `database.<env>.toml`     |
//! | `ADMINRUN_LOG_FORMAT`      | `text`   | `text` or `json`                       |
//! | `RUST_LOG`                 | --       | Overrides the default log filter       |

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use adminrun_cli::{report, telemetry, Cli, CliError, Reporter, RunnerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list {
        return finish(adminrun_cli::write_script_list(io::stdout().lock()), Reporter::Stderr);
    }

    let Some(invocation) = cli.invocation() else {
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "--env and a script identifier are required",
            )
            .exit()
    };

    if let Err(err) = adminrun_cli::load_env_files(invocation.environment) {
        return finish(Err(err), Reporter::Stderr);
    }

    let config = match RunnerConfig::from_env() {
        Ok(config) => config,
        Err(err) => return finish(Err(err), Reporter::Stderr),
    };
    telemetry::init(config.log_format);
    tracing::debug!(credentials_dir = %config.credentials_dir.display(), "Loaded runner configuration");

    let result = adminrun_cli::run(&invocation, &config, io::stdin().lock(), io::stderr()).await;
    finish(result, Reporter::Tracing)
}

fn finish(result: Result<(), CliError>, reporter: Reporter) -> ExitCode {
    ExitCode::from(report(result, reporter, io::stderr()))
}
