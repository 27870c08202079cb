//! Scripts shipped with the runner.

pub mod ping;
pub mod session_info;
pub mod update_user;

use adminrun_db::PgConnector;

use crate::error::RegistryError;
use crate::registry::ScriptRegistry;
use crate::script::ScriptFactory;

/// The registry the `adminrun` binary dispatches against.
pub fn builtin_registry() -> Result<ScriptRegistry<PgConnector>, RegistryError> {
    ScriptRegistry::from_entries([
        (ping::IDENTIFIER, ping::Ping::boxed::<PgConnector> as ScriptFactory<PgConnector>),
        (session_info::IDENTIFIER, session_info::SessionInfo::boxed as ScriptFactory<PgConnector>),
        (update_user::IDENTIFIER, update_user::UpdateUser::boxed as ScriptFactory<PgConnector>),
    ])
}
