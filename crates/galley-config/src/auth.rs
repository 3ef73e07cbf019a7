//! Login configuration for the protocol server.
//!
//! Credential storage is owned by an external system; Galley only checks a
//! shared service token for known accounts. An empty token disables login.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Shared secret every account presents as its password.
    #[serde(default)]
    pub service_token: String,
}

impl AuthConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.service_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        assert!(!AuthConfig::default().is_configured());
    }

    #[test]
    fn configured_when_token_set() {
        let config = AuthConfig {
            service_token: "sekrit".into(),
        };
        assert!(config.is_configured());
    }
}
