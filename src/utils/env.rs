/// Get environment variable with LEADGATE_ prefix, falling back to unprefixed version
///
/// This helper function checks for `LEADGATE_{key}` first, then falls back to `{key}`
/// for compatibility with standard environment variable naming.
///
/// # Examples
///
/// ```rust,ignore
/// use crate::utils::get_env_with_prefix;
///
/// // Checks LEADGATE_DEFAULT_PLAN first, then DEFAULT_PLAN
/// let plan = get_env_with_prefix("DEFAULT_PLAN");
///
/// // Checks LEADGATE_LOG_LEVEL first, then LOG_LEVEL
/// let level = get_env_with_prefix("LOG_LEVEL");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("LEADGATE_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_with_prefix() {
        // Test with LEADGATE_ prefix
        unsafe {
            std::env::set_var("LEADGATE_GATE_TEST_VAR", "prefixed_value");
        }
        assert_eq!(get_env_with_prefix("GATE_TEST_VAR"), Some("prefixed_value".to_string()));
        unsafe {
            std::env::remove_var("LEADGATE_GATE_TEST_VAR");
        }

        // Test with unprefixed fallback
        unsafe {
            std::env::set_var("GATE_FALLBACK_VAR", "unprefixed_value");
        }
        assert_eq!(get_env_with_prefix("GATE_FALLBACK_VAR"), Some("unprefixed_value".to_string()));
        unsafe {
            std::env::remove_var("GATE_FALLBACK_VAR");
        }

        // Test non-existent variable
        assert_eq!(get_env_with_prefix("GATE_NON_EXISTENT_VAR"), None);
    }
}
