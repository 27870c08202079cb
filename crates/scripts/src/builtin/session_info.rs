//! `session-info`: report which backend session serves each named database.

use adminrun_core::input::{FieldType, InputSchema, TypedInput, ValidationError};
use adminrun_db::{ConnectionManager, PgConnector};
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use sqlx::Row;
use validator::Validate;

use crate::script::Script;

pub const IDENTIFIER: &str = "session-info";

const SESSION_SQL: &str = "SELECT pg_backend_pid() AS pid, current_database()::text AS database, current_user::text AS role";

#[derive(Debug, Deserialize, Validate)]
struct SessionInfoInput {
    #[validate(length(min = 1, message = "name at least one database"))]
    databases: Vec<String>,
}

#[derive(Debug, Default)]
pub struct SessionInfo {
    databases: Vec<String>,
}

impl SessionInfo {
    pub fn boxed() -> Box<dyn Script<PgConnector>> {
        Box::new(Self::default())
    }
}

#[async_trait]
impl Script<PgConnector> for SessionInfo {
    fn input_schema(&self) -> Option<InputSchema> {
        Some(InputSchema::new().required("databases", FieldType::list_of(FieldType::String)))
    }

    fn accept_input(&mut self, input: TypedInput) -> Result<(), ValidationError> {
        let parsed: SessionInfoInput = input.parse()?;
        self.databases = parsed.databases;
        Ok(())
    }

    async fn execute(&mut self, db: &ConnectionManager<PgConnector>) -> anyhow::Result<()> {
        for name in &self.databases {
            let rows = db.fetch_all(name, SESSION_SQL, &[]).await?;
            let row = rows
                .first()
                .with_context(|| format!("no session row returned for '{name}'"))?;
            let pid: i32 = row.try_get("pid")?;
            let database: String = row.try_get("database")?;
            let role: String = row.try_get("role")?;
            tracing::info!(db_name = %name, pid, %database, %role, "Session");
        }
        Ok(())
    }
}
