//! The contract every registered script implements.

use adminrun_core::input::{InputSchema, TypedInput, ValidationError};
use adminrun_db::{ConnectionManager, Connector};
use async_trait::async_trait;

/// One unit of administrative work.
///
/// The dispatcher creates a fresh instance per run, hands it its validated
/// input (when [`input_schema`](Self::input_schema) returns a schema), then
/// calls [`execute`](Self::execute) once.
///
/// `K` is the connector the script needs. Scripts that only use the generic
/// manager operations implement `Script<K>` for every `K`; scripts that run
/// SQL implement `Script<PgConnector>`.
#[async_trait]
pub trait Script<K: Connector>: Send {
    /// Input contract. `None` means the script takes no arguments and input
    /// construction is skipped.
    fn input_schema(&self) -> Option<InputSchema> {
        None
    }

    /// Receive the validated input before `execute`. Scripts usually
    /// [`parse`](TypedInput::parse) it into their own struct here, which may
    /// reject values that pass the schema but break a value-level rule.
    fn accept_input(&mut self, input: TypedInput) -> Result<(), ValidationError> {
        let _ = input;
        Ok(())
    }

    /// Run the script. Errors are propagated to the caller unchanged.
    async fn execute(&mut self, db: &ConnectionManager<K>) -> anyhow::Result<()>;
}

/// Zero-argument constructor stored in the registry.
pub type ScriptFactory<K> = fn() -> Box<dyn Script<K>>;
