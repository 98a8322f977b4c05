//! Extension configuration parsed from build-time variables.
//!
//! A browser has no process environment, so the variables are captured by
//! `option_env!` when the WASM bundle is compiled:
//!
//! - `NOPHOTON_SCOPE`: `global` (default) or `per_origin`
//! - `NOPHOTON_ABSENT_POLICY`: `enable` (default), `disable` or `auto_detect`

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::keys::Scope;

pub const SCOPE_VAR: &str = "NOPHOTON_SCOPE";
pub const ABSENT_POLICY_VAR: &str = "NOPHOTON_ABSENT_POLICY";

/// Error returned when a configuration value is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown {var}: {value}")]
    Unknown { var: &'static str, value: String },
}

/// What the overlay does on a page whose enable flag has never been stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AbsentPolicy {
    /// Treat a missing flag as enabled.
    #[default]
    Enable,
    /// Treat a missing flag as disabled.
    Disable,
    /// Apply only when the page cannot be classified as light or dark.
    AutoDetect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub scope: Scope,
    pub absent_policy: AbsentPolicy,
}

impl Config {
    /// Build config from the variables captured at compile time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unknown`] when a variable holds an unrecognized value.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::parse(option_env!("NOPHOTON_SCOPE"), option_env!("NOPHOTON_ABSENT_POLICY"))
    }

    /// Build config from raw optional values; `None` selects the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unknown`] when a value is not recognized.
    pub fn parse(scope: Option<&str>, absent_policy: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self { scope: parse_scope(scope)?, absent_policy: parse_absent_policy(absent_policy)? })
    }
}

fn parse_scope(raw: Option<&str>) -> Result<Scope, ConfigError> {
    match raw.map(str::trim).unwrap_or("global") {
        "global" => Ok(Scope::Global),
        "per_origin" => Ok(Scope::PerOrigin),
        other => Err(ConfigError::Unknown { var: SCOPE_VAR, value: other.to_owned() }),
    }
}

fn parse_absent_policy(raw: Option<&str>) -> Result<AbsentPolicy, ConfigError> {
    match raw.map(str::trim).unwrap_or("enable") {
        "enable" => Ok(AbsentPolicy::Enable),
        "disable" => Ok(AbsentPolicy::Disable),
        "auto_detect" => Ok(AbsentPolicy::AutoDetect),
        other => Err(ConfigError::Unknown { var: ABSENT_POLICY_VAR, value: other.to_owned() }),
    }
}
