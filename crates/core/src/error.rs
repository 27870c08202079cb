use crate::input::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown environment '{0}' (expected one of: dev, stg, prod)")]
    UnknownEnvironment(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
