//! Credential store for the forward-auth service.

use crate::config::AuthConfig;

/// Ordered (username, password) pairs, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    pairs: Vec<(String, String)>,
}

impl CredentialStore {
    /// Pair `usernames[i]` with `passwords[i]`. Surplus entries in the longer
    /// list are ignored; config validation rejects mismatched lengths first.
    pub fn from_lists(usernames: &[String], passwords: &[String]) -> Self {
        let pairs = usernames
            .iter()
            .cloned()
            .zip(passwords.iter().cloned())
            .collect();
        Self { pairs }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::from_lists(&config.usernames, &config.passwords)
    }

    /// Whether the pair matches a configured one exactly.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.pairs
            .iter()
            .any(|(u, p)| u == username && p == password)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
