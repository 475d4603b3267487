//! Passcode gate for dashboard access

use crate::config::Configuration;

/// Check a submitted passcode against the configured policy.
///
/// This is an access nuisance-barrier, not an authentication system: the
/// comparison is byte-exact, with no normalization, lockout, or rate
/// limiting. When no passcode is required every candidate is accepted.
pub fn check(config: &Configuration, candidate: &str) -> bool {
    !config.require_passcode || config.passcode == candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_passcode(passcode: &str) -> Configuration {
        Configuration {
            require_passcode: true,
            passcode: passcode.to_string(),
            apps: Vec::new(),
        }
    }

    #[test]
    fn accepts_anything_when_not_required() {
        let config = Configuration::default();
        assert!(check(&config, ""));
        assert!(check(&config, "whatever"));
    }

    #[test]
    fn exact_match_only_when_required() {
        let config = config_with_passcode("abc123");
        assert!(check(&config, "abc123"));
        assert!(!check(&config, "ABC123"));
        assert!(!check(&config, ""));
        assert!(!check(&config, "abc123 "));
    }

    #[test]
    fn empty_passcode_matches_empty_candidate() {
        let config = config_with_passcode("");
        assert!(check(&config, ""));
        assert!(!check(&config, "x"));
    }
}
