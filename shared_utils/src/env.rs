use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    std::env::var(name).map_err(|_| MissingEnvVarError(name.to_string()))
}

/// Reads an optional environment variable.
///
/// Unset and blank values are both treated as absent.
pub fn get_optional_env_var(name: &str) -> Option<String> {
    get_env_var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn missing_var_is_reported_by_name() {
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_MISSING") };
        let err = get_env_var("SHARED_UTILS_TEST_MISSING").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable: SHARED_UTILS_TEST_MISSING"
        );
    }

    #[test]
    #[serial]
    fn blank_optional_var_is_absent() {
        unsafe { std::env::set_var("SHARED_UTILS_TEST_BLANK", "   ") };
        assert_eq!(get_optional_env_var("SHARED_UTILS_TEST_BLANK"), None);

        unsafe { std::env::set_var("SHARED_UTILS_TEST_BLANK", " quant.toml ") };
        assert_eq!(
            get_optional_env_var("SHARED_UTILS_TEST_BLANK").as_deref(),
            Some("quant.toml")
        );
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_BLANK") };
    }
}
