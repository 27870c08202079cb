//! `update-user`: change a user's email and/or active flag in the `users`
//! database.

use adminrun_core::input::{FieldType, InputSchema, TypedInput, ValidationError, ViolationKind};
use adminrun_db::{ConnectionManager, PgConnector};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::script::Script;

pub const IDENTIFIER: &str = "update-user";

const DB_NAME: &str = "users";

// Absent fields bind as text-typed NULLs; the casts pin each parameter to its
// column type.
const UPDATE_SQL: &str = "UPDATE users \
     SET email = COALESCE($2::text, email), is_active = COALESCE($3::boolean, is_active) \
     WHERE id = $1::bigint";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub user_id: i64,
    #[validate(email(message = "not a valid email address"))]
    pub email: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub dry_run: bool,
}

impl UpdateUserInput {
    fn has_changes(&self) -> bool {
        self.email.is_some() || self.is_active.is_some()
    }
}

#[derive(Debug, Default)]
pub struct UpdateUser {
    input: Option<UpdateUserInput>,
}

impl UpdateUser {
    pub fn boxed() -> Box<dyn Script<PgConnector>> {
        Box::new(Self::default())
    }
}

#[async_trait]
impl Script<PgConnector> for UpdateUser {
    fn input_schema(&self) -> Option<InputSchema> {
        Some(
            InputSchema::new()
                .required("user_id", FieldType::Integer)
                .optional("email", FieldType::String)
                .optional("is_active", FieldType::Boolean)
                .with_default("dry_run", FieldType::Boolean, Value::Bool(false)),
        )
    }

    fn accept_input(&mut self, input: TypedInput) -> Result<(), ValidationError> {
        let parsed: UpdateUserInput = input.parse()?;
        if !parsed.has_changes() {
            return Err(ValidationError::single(
                "",
                ViolationKind::Missing,
                "nothing to update: pass email and/or is_active",
            ));
        }
        self.input = Some(parsed);
        Ok(())
    }

    async fn execute(&mut self, db: &ConnectionManager<PgConnector>) -> anyhow::Result<()> {
        let input = self
            .input
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("update-user executed without input"))?;

        if input.dry_run {
            let rows = db
                .fetch_all(DB_NAME, "SELECT id FROM users WHERE id = $1::bigint", &[json!(input.user_id)])
                .await?;
            if rows.is_empty() {
                anyhow::bail!("user {} not found", input.user_id);
            }
            tracing::info!(
                user_id = input.user_id,
                email = ?input.email,
                is_active = ?input.is_active,
                "Dry run, user left unchanged",
            );
            return Ok(());
        }

        let affected = db
            .execute(
                DB_NAME,
                UPDATE_SQL,
                &[json!(input.user_id), json!(input.email), json!(input.is_active)],
            )
            .await?;
        if affected == 0 {
            anyhow::bail!("user {} not found", input.user_id);
        }

        tracing::info!(user_id = input.user_id, "User updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use adminrun_core::input;
    use assert_matches::assert_matches;

    use super::*;

    fn accept(args: Value) -> Result<UpdateUser, ValidationError> {
        let mut script = UpdateUser::default();
        let schema = Script::<PgConnector>::input_schema(&script).unwrap();
        let typed = input::build_from_value(&schema, &args)?;
        Script::<PgConnector>::accept_input(&mut script, typed)?;
        Ok(script)
    }

    #[test]
    fn accepts_minimal_input_and_defaults_dry_run() {
        let script = accept(json!({"user_id": 7, "is_active": false})).unwrap();
        let input = script.input.unwrap();
        assert_eq!(input.user_id, 7);
        assert_eq!(input.is_active, Some(false));
        assert!(!input.dry_run);
        assert!(input.has_changes());
    }

    #[test]
    fn non_integer_user_id_is_a_type_mismatch() {
        let err = accept(json!({"user_id": "abc"})).unwrap_err();
        assert!(err.has_field("user_id"));
        assert_eq!(err.violations[0].kind, ViolationKind::TypeMismatch);
    }

    #[test]
    fn value_rules_are_constraint_violations() {
        let err = accept(json!({"user_id": 0, "email": "not-an-email"})).unwrap_err();
        assert_eq!(err.fields(), vec!["email", "user_id"]);
        assert!(err.violations.iter().all(|v| v.kind == ViolationKind::Constraint));
    }

    #[test]
    fn input_without_changes_is_rejected() {
        let err = accept(json!({"user_id": 7, "dry_run": true})).unwrap_err();
        assert_matches!(
            err.violations.as_slice(),
            [v] if v.kind == ViolationKind::Missing && v.message.starts_with("nothing to update")
        );
    }

    #[test]
    fn missing_user_id_is_rejected() {
        let err = accept(json!({"email": "a@example.com"})).unwrap_err();
        assert_matches!(err.violations.as_slice(), [v] if v.field == "user_id" && v.kind == ViolationKind::Missing);
    }
}
