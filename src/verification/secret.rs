/// Webhook secret check
use subtle::ConstantTimeEq;

/// Compare the secret carried by a ping against the configured one.
///
/// # Arguments
/// * `expected` - Configured webhook secret
/// * `provided` - `secret` field of the event, if any
///
/// # Returns
/// true only if a secret was provided and matches
pub fn secret_matches(expected: &str, provided: Option<&str>) -> bool {
    match provided {
        // Constant-time comparison to prevent timing attacks
        Some(provided) => expected.as_bytes().ct_eq(provided.as_bytes()).into(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_matches() {
        assert!(secret_matches("hook_secret", Some("hook_secret")));

        // Wrong secret should fail
        assert!(!secret_matches("hook_secret", Some("other_secret")));

        // Prefix or extension should fail
        assert!(!secret_matches("hook_secret", Some("hook")));
        assert!(!secret_matches("hook_secret", Some("hook_secret0")));

        // Absent secret should fail
        assert!(!secret_matches("hook_secret", None));
    }
}
