//! Protocol server configuration.

use serde::{Deserialize, Serialize};

/// Default control-connection bind address.
fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

/// Default control port. The well-known FTP port needs privileges, so the
/// default stays above 1024.
const fn default_port() -> u16 {
    2121
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address the control listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Control port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address advertised in PASV replies. Defaults to `bind_addr` when empty.
    #[serde(default)]
    pub passive_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            passive_addr: String::new(),
        }
    }
}

impl ServerConfig {
    /// The address clients are told to open data connections to.
    #[must_use]
    pub fn advertised_addr(&self) -> &str {
        if self.passive_addr.is_empty() {
            &self.bind_addr
        } else {
            &self.passive_addr
        }
    }
}
