//! Registered administrative scripts and the dispatcher that runs them.
//!
//! A run is: bind the environment, resolve the identifier in the
//! [`ScriptRegistry`], validate the JSON arguments against the script's
//! schema, then call [`Script::execute`] with the connection manager.

pub mod builtin;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod script;

pub use dispatcher::Dispatcher;
pub use error::{RegistryError, RunError};
pub use registry::ScriptRegistry;
pub use script::{Script, ScriptFactory};
