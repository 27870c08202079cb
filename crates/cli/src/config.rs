use std::path::PathBuf;
use std::str::FromStr;

use crate::error::CliError;

/// Where credentials live and how logs are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Directory holding `database.<env>.toml` (default: `config`).
    pub credentials_dir: PathBuf,
    /// Log output format (default: `text`).
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(CliError::Config(format!(
                "ADMINRUN_LOG_FORMAT must be 'text' or 'json', got '{other}'"
            ))),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default  |
    /// |----------------------------|----------|
    /// | `ADMINRUN_CREDENTIALS_DIR` | `config` |
    /// | `ADMINRUN_LOG_FORMAT`      | `text`   |
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let credentials_dir = lookup("ADMINRUN_CREDENTIALS_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| "config".into())
            .into();

        let log_format = match lookup("ADMINRUN_LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            credentials_dir,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<RunnerConfig, CliError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        RunnerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.credentials_dir, PathBuf::from("config"));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("ADMINRUN_CREDENTIALS_DIR", "/etc/adminrun"),
            ("ADMINRUN_LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.credentials_dir, PathBuf::from("/etc/adminrun"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_unknown_log_format() {
        assert_matches!(load(&[("ADMINRUN_LOG_FORMAT", "xml")]), Err(CliError::Config(msg)) if msg.contains("'xml'"));
    }
}
