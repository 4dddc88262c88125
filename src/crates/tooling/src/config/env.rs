//! Environment variable access with typed parsing

use crate::{Result, ToolingError};
use std::env;
use std::str::FromStr;

/// Read an environment variable.
///
/// Returns `Ok(None)` when the variable is unset or blank, and an error when
/// it holds invalid UTF-8.
pub fn get_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(val) if val.trim().is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ToolingError::Env {
            key: key.to_string(),
            message: "contains invalid UTF-8".to_string(),
        }),
    }
}

/// Read and parse an environment variable.
pub fn get_env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env(key)?
        .map(|val| {
            val.trim().parse::<T>().map_err(|e| ToolingError::Env {
                key: key.to_string(),
                message: format!("failed to parse {:?}: {}", val, e),
            })
        })
        .transpose()
}

/// A view over the process environment with an optional name prefix.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: String,
}

impl EnvSource {
    /// Source whose lookups are `{prefix}{NAME}` with `NAME` uppercased.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Source without a prefix, for well-known variable names.
    pub fn bare() -> Self {
        Self::default()
    }

    /// Full variable name for `name`.
    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name.to_uppercase())
    }

    /// String value, `None` if unset or blank.
    pub fn string(&self, name: &str) -> Result<Option<String>> {
        get_env(&self.key(name))
    }

    /// Parsed value, `None` if unset.
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        get_env_parse(&self.key(name))
    }

    /// Boolean flag. Accepts true/false, 1/0, yes/no, on/off in any case.
    pub fn flag(&self, name: &str) -> Result<Option<bool>> {
        let key = self.key(name);
        match get_env(&key)? {
            Some(val) => match val.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(ToolingError::Env {
                    key,
                    message: format!("invalid boolean {:?}", val),
                }),
            },
            None => Ok(None),
        }
    }

    /// Overwrite `target` when the variable is set.
    pub fn apply_string(&self, name: &str, target: &mut String) -> Result<()> {
        if let Some(val) = self.string(name)? {
            *target = val;
        }
        Ok(())
    }

    /// Overwrite an optional `target` when the variable is set.
    pub fn apply_optional(&self, name: &str, target: &mut Option<String>) -> Result<()> {
        if let Some(val) = self.string(name)? {
            *target = Some(val);
        }
        Ok(())
    }
}
