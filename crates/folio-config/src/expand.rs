//! Environment variable expansion for configuration strings.
//!
//! `${VAR}` expands to the value of VAR and fails when it is unset;
//! `${VAR:-default}` falls back to `default`. Values without `${` are returned
//! untouched.

use crate::ConfigError;

/// Variable that was referenced but not set.
struct UnsetVar(String);

/// Expand `${...}` references in `value`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let lookup = |var: &str| match std::env::var(var) {
        Ok(val) => Ok(Some(val)),
        Err(_) => Err(UnsetVar(var.to_owned())),
    };

    shellexpand::env_with_context(value, lookup)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.cause.0),
        })
}

/// Expand a string field in place.
pub(crate) fn expand_in_place(value: &mut String, field: &str) -> Result<(), ConfigError> {
    let expanded = expand_env(value, field)?;
    *value = expanded;
    Ok(())
}
