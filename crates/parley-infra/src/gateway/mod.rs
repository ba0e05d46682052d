//! Completion gateway clients.

pub mod openai;
mod types;

use secrecy::SecretString;

/// Read a gateway API key from the named environment variable.
///
/// Returns `None` when the variable is unset or empty. The key goes
/// straight into a [`SecretString`] so it never sits around as plain text.
pub fn api_key_from_env(var: &str) -> Option<SecretString> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_from_env_missing() {
        assert!(api_key_from_env("PARLEY_TEST_KEY_THAT_DOES_NOT_EXIST").is_none());
    }

    #[test]
    fn test_api_key_from_env_present() {
        // Safety: test-local variable name, no other test reads it.
        unsafe { std::env::set_var("PARLEY_TEST_GATEWAY_KEY", "sk-test") };
        assert!(api_key_from_env("PARLEY_TEST_GATEWAY_KEY").is_some());
        unsafe { std::env::remove_var("PARLEY_TEST_GATEWAY_KEY") };
    }
}
