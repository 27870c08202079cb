//! Resolve -> validate -> execute, for one script run.

use std::time::Instant;

use adminrun_core::environment::Environment;
use adminrun_core::input;
use adminrun_db::{ConnectionManager, Connector, DbError};
use serde_json::Value;
use tracing::Instrument;

use crate::error::RunError;
use crate::registry::ScriptRegistry;

/// Runs registered scripts against a connection manager.
///
/// Adds no recovery of its own: every failure stops the run and is returned
/// as the [`RunError`] variant for the stage that failed.
pub struct Dispatcher<'a, K: Connector> {
    registry: &'a ScriptRegistry<K>,
    db: &'a ConnectionManager<K>,
}

impl<'a, K: Connector> Dispatcher<'a, K> {
    pub fn new(registry: &'a ScriptRegistry<K>, db: &'a ConnectionManager<K>) -> Self {
        Self { registry, db }
    }

    /// Run `identifier` in `environment` with `raw_args`.
    ///
    /// 1. Bind the connection manager to `environment`.
    /// 2. Resolve the identifier.
    /// 3. Construct the script.
    /// 4. Validate `raw_args` against its schema, if it declares one.
    /// 5. Execute it.
    ///
    /// Steps 2-4 fail before any connection is opened. A missing-credentials
    /// failure raised during execution is reported as
    /// [`RunError::Configuration`]; anything else from the script as
    /// [`RunError::Execution`].
    pub async fn run(&self, environment: Environment, identifier: &str, raw_args: &Value) -> Result<(), RunError> {
        // 1. Bind environment.
        self.db.set_environment(environment).await;

        // 2. Resolve.
        let factory = self.registry.resolve(identifier)?;

        // 3. Construct.
        let mut script = factory();

        // 4. Validate input.
        match script.input_schema() {
            Some(schema) => {
                let typed = input::build_from_value(&schema, raw_args)?;
                script.accept_input(typed)?;
            }
            None => {
                if !is_empty_args(raw_args) {
                    tracing::warn!(script = identifier, "Script takes no input, ignoring arguments");
                }
            }
        }

        // 5. Execute.
        let span = tracing::info_span!("script", script = identifier, %environment);
        let started = Instant::now();
        tracing::info!(parent: &span, "Running script");

        script
            .execute(self.db)
            .instrument(span.clone())
            .await
            .map_err(|cause| classify_failure(identifier, cause))?;

        tracing::info!(
            parent: &span,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Script completed",
        );
        Ok(())
    }
}

fn is_empty_args(raw_args: &Value) -> bool {
    match raw_args {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn classify_failure(identifier: &str, cause: anyhow::Error) -> RunError {
    let context = configuration_context(&cause);
    match cause.downcast::<DbError>() {
        Ok(db) if db.is_configuration() => RunError::Configuration { source: db, context },
        Ok(db) => RunError::Execution {
            identifier: identifier.to_string(),
            cause: db.into(),
        },
        Err(cause) => RunError::Execution {
            identifier: identifier.to_string(),
            cause,
        },
    }
}

/// Messages of the context layers wrapped around the `DbError`, joined
/// outermost first.
fn configuration_context(cause: &anyhow::Error) -> Option<String> {
    let layers: Vec<String> = cause
        .chain()
        .take_while(|err| !err.is::<DbError>())
        .map(ToString::to_string)
        .collect();
    (!layers.is_empty()).then(|| layers.join(": "))
}
