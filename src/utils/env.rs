//! Environment variable helpers used for flag fallback

use std::env;
use tracing::trace;

/// Environment variable utilities
#[derive(Debug)]
pub struct EnvUtils;

impl EnvUtils {
    /// Get an environment variable, treating unset and non-unicode the same
    pub fn get_var(key: &str) -> Option<String> {
        let value = env::var(key).ok();
        trace!(key, found = value.is_some(), "Environment lookup");
        value
    }

    /// Get an environment variable with a default value
    pub fn get_var_or_default(key: &str, default: &str) -> String {
        Self::get_var(key).unwrap_or_else(|| default.to_string())
    }

    /// Derive a variable name such as `APP_DRY_RUN` from a prefix and a flag name
    pub fn derive_name(prefix: &str, flag: &str) -> String {
        let flag = flag.replace('-', "_").to_uppercase();
        if prefix.is_empty() {
            return flag;
        }
        format!("{}_{}", prefix.trim_end_matches('_').to_uppercase(), flag)
    }

    /// Set environment variable (mainly for testing)
    pub fn set_var<K, V>(key: K, value: V)
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        unsafe { env::set_var(key.as_ref(), value.as_ref()) }
    }

    /// Remove environment variable (mainly for testing)
    pub fn remove_var<K: AsRef<str>>(key: K) {
        unsafe { env::remove_var(key.as_ref()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_utils() {
        let value = EnvUtils::get_var_or_default("CMDKIT_NONEXISTENT_VAR", "default");
        assert_eq!(value, "default");

        EnvUtils::set_var("CMDKIT_ENV_TEST_VAR", "test_value");
        assert_eq!(
            EnvUtils::get_var("CMDKIT_ENV_TEST_VAR").as_deref(),
            Some("test_value")
        );

        EnvUtils::remove_var("CMDKIT_ENV_TEST_VAR");
        assert_eq!(EnvUtils::get_var("CMDKIT_ENV_TEST_VAR"), None);
    }

    #[test]
    fn test_derive_name() {
        assert_eq!(EnvUtils::derive_name("app", "dry-run"), "APP_DRY_RUN");
        assert_eq!(EnvUtils::derive_name("APP_", "age"), "APP_AGE");
        assert_eq!(EnvUtils::derive_name("", "age"), "AGE");
    }
}
