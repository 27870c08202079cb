use adminrun_core::environment::Environment;

/// Errors raised while resolving credentials, opening, using or closing a
/// named connection.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// No credential entry for the database under the bound environment.
    #[error("Database '{db_name}' not found in credentials for environment '{environment}' ({location})")]
    MissingCredentials {
        db_name: String,
        environment: Environment,
        location: String,
    },

    /// The credential source exists but cannot be used as-is.
    #[error("Invalid credentials in {location}: {message}")]
    InvalidCredentials { location: String, message: String },

    #[error("Failed to connect to database '{db_name}': {source}")]
    Connect {
        db_name: String,
        #[source]
        source: sqlx::Error,
    },

    /// The handle was closed (pool teardown or environment switch) while a
    /// caller still held it.
    #[error("Connection to database '{db_name}' is closed")]
    HandleClosed { db_name: String },

    #[error("Failed to close connection to database '{db_name}': {source}")]
    Close {
        db_name: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Query against database '{db_name}' failed: {source}")]
    Query {
        db_name: String,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    /// Whether the failure comes from configuration rather than the server.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials { .. } | Self::InvalidCredentials { .. }
        )
    }
}
