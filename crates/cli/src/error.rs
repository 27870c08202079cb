use adminrun_scripts::{RegistryError, RunError};

/// Everything that can stop the binary, with its exit code.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Run(#[from] RunError),

    #[error("Production run not confirmed, aborting")]
    Aborted,

    #[error("Failed to load environment file '{path}': {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code. `2` is left to clap for usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Run(err) => err.exit_code(),
            Self::Aborted => 6,
            Self::EnvFile { .. } | Self::Config(_) => 5,
            Self::Registry(_) | Self::Io(_) => 1,
        }
    }
}
