use adminrun_core::input::ValidationError;
use adminrun_db::DbError;

/// Why a dispatched run did not complete. Each variant names the stage that
/// failed and maps to its own process exit code.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The identifier is not in the registry.
    #[error("Script not found: '{identifier}'")]
    ScriptNotFound { identifier: String },

    /// The arguments do not satisfy the script's input contract. Raised
    /// before any connection is opened.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A database the script asked for has no usable credentials in the
    /// current environment. `context` is whatever the script wrapped the
    /// failure in, outermost first.
    #[error("Configuration error: {}", with_context(.context, .source))]
    Configuration {
        #[source]
        source: DbError,
        context: Option<String>,
    },

    /// The script itself failed.
    #[error("Script '{identifier}' failed: {cause:#}")]
    Execution { identifier: String, cause: anyhow::Error },
}

impl RunError {
    /// Process exit code for this failure.
    ///
    /// | Stage         | Code |
    /// |---------------|------|
    /// | execution     | 1    |
    /// | not found     | 3    |
    /// | validation    | 4    |
    /// | configuration | 5    |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Execution { .. } => 1,
            Self::ScriptNotFound { .. } => 3,
            Self::Validation(_) => 4,
            Self::Configuration { .. } => 5,
        }
    }
}

fn with_context(context: &Option<String>, source: &DbError) -> String {
    match context {
        Some(context) => format!("{context}: {source}"),
        None => source.to_string(),
    }
}

/// The registry was built with two scripts under one identifier.
#[derive(Debug, thiserror::Error)]
#[error("Script identifier '{0}' is registered more than once")]
pub struct RegistryError(pub String);
