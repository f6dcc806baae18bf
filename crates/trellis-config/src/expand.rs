//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Supports:
/// - `${VAR}` - expands to the value of VAR, errors if unset
/// - `${VAR:-default}` - expands to VAR if set, otherwise uses default
///
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_literal_unchanged() {
        let result = expand_env("templates/blocks", "blocks.template_dir").unwrap();
        assert_eq!(result, "templates/blocks");
    }

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TRELLIS_TEST_TEMPLATES", "/srv/templates");
        }
        let result = expand_env("${TRELLIS_TEST_TEMPLATES}/blocks", "blocks.template_dir").unwrap();
        assert_eq!(result, "/srv/templates/blocks");
        unsafe {
            std::env::remove_var("TRELLIS_TEST_TEMPLATES");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TRELLIS_UNSET_TEST");
        }
        let result = expand_env("${TRELLIS_UNSET_TEST:-templates}", "blocks.template_dir").unwrap();
        assert_eq!(result, "templates");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TRELLIS_MISSING_TEST");
        }
        let err = expand_env("${TRELLIS_MISSING_TEST}", "blocks.template_dir").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("TRELLIS_MISSING_TEST"));
        assert!(err.to_string().contains("blocks.template_dir"));
    }
}
