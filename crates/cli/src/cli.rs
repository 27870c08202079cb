use adminrun_core::environment::Environment;
use clap::{Parser, ValueEnum};

/// Run one registered administrative script against an environment.
#[derive(Debug, Parser)]
#[command(name = "adminrun", version, about)]
pub struct Cli {
    /// Target environment.
    #[arg(long = "env", value_enum, required_unless_present = "list")]
    pub env: Option<EnvArg>,

    /// Script identifier, e.g. `update-user`.
    #[arg(required_unless_present = "list")]
    pub script: Option<String>,

    /// Script arguments as a JSON object.
    #[arg(long, default_value = "{}")]
    pub args: String,

    /// Print the registered script identifiers and exit.
    #[arg(long, conflicts_with_all = ["env", "script"])]
    pub list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvArg {
    Dev,
    Stg,
    Prod,
}

impl From<EnvArg> for Environment {
    fn from(arg: EnvArg) -> Self {
        match arg {
            EnvArg::Dev => Environment::Dev,
            EnvArg::Stg => Environment::Stg,
            EnvArg::Prod => Environment::Prod,
        }
    }
}

/// A fully specified script run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub environment: Environment,
    pub script: String,
    pub args: String,
}

impl Cli {
    /// The run this command line asks for, or `None` for `--list`.
    pub fn invocation(&self) -> Option<Invocation> {
        match (self.env, &self.script) {
            (Some(env), Some(script)) => Some(Invocation {
                environment: env.into(),
                script: script.clone(),
                args: self.args.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn parses_a_full_invocation() {
        let cli = Cli::try_parse_from(["adminrun", "--env", "stg", "update-user", "--args", r#"{"user_id": 1}"#]).unwrap();
        assert_eq!(
            cli.invocation(),
            Some(Invocation {
                environment: Environment::Stg,
                script: "update-user".to_string(),
                args: r#"{"user_id": 1}"#.to_string(),
            })
        );
    }

    #[test]
    fn args_default_to_an_empty_object() {
        let cli = Cli::try_parse_from(["adminrun", "--env", "dev", "ping"]).unwrap();
        assert_eq!(cli.args, "{}");
    }

    #[test]
    fn env_is_required_for_a_run() {
        let err = Cli::try_parse_from(["adminrun", "ping"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn unknown_env_is_rejected() {
        let err = Cli::try_parse_from(["adminrun", "--env", "qa", "ping"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn list_needs_no_env_or_script() {
        let cli = Cli::try_parse_from(["adminrun", "--list"]).unwrap();
        assert!(cli.list);
        assert_eq!(cli.invocation(), None);
    }
}
