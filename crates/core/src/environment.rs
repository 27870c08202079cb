//! Deployment tiers a script can be run against.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Development tier.
pub const ENV_DEV: &str = "dev";

/// Staging tier.
pub const ENV_STG: &str = "stg";

/// Production tier. Runs against it require interactive confirmation.
pub const ENV_PROD: &str = "prod";

/// A named deployment tier.
///
/// Determines which credential file is read and whether the runner asks for
/// confirmation before dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Stg,
    Prod,
}

impl Environment {
    /// Every known environment, in promotion order.
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Stg, Environment::Prod];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dev => ENV_DEV,
            Self::Stg => ENV_STG,
            Self::Prod => ENV_PROD,
        }
    }

    /// Whether this tier is production-like and must be confirmed by the
    /// operator before any script runs.
    pub fn requires_confirmation(self) -> bool {
        matches!(self, Self::Prod)
    }

    /// Name of the dotenv file holding this tier's process environment,
    /// e.g. `.env.stg`.
    pub fn env_file_name(self) -> String {
        format!(".env.{}", self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ENV_DEV => Ok(Self::Dev),
            ENV_STG => Ok(Self::Stg),
            ENV_PROD => Ok(Self::Prod),
            other => Err(CoreError::UnknownEnvironment(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Dev);
        assert_eq!("stg".parse::<Environment>().unwrap(), Environment::Stg);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Prod);
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert_matches!(
            "PROD".parse::<Environment>(),
            Err(CoreError::UnknownEnvironment(name)) if name == "PROD"
        );
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for env in Environment::ALL {
            assert_eq!(env.to_string().parse::<Environment>().unwrap(), env);
        }
    }

    #[test]
    fn only_prod_requires_confirmation() {
        assert!(!Environment::Dev.requires_confirmation());
        assert!(!Environment::Stg.requires_confirmation());
        assert!(Environment::Prod.requires_confirmation());
    }

    #[test]
    fn env_file_name_uses_tier_suffix() {
        assert_eq!(Environment::Stg.env_file_name(), ".env.stg");
    }
}
