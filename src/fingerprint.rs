//! Client fingerprint: opaque identifier used to group attempts.
//!
//! The identifier is a best-effort, collision-tolerant heuristic built from
//! signals the browser reports about itself. It is NOT an identity and must
//! never be used for authentication.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hex characters kept from the digest.
pub const IDENTIFIER_LEN: usize = 32;

/// Hex length of a SHA-256 digest.
const SHA256_HEX_LEN: usize = 64;

const _: () = assert!(IDENTIFIER_LEN <= SHA256_HEX_LEN);

/// Environment signals reported by the browser. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEnvironment {
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub screen_width: String,
    #[serde(default)]
    pub screen_height: String,
    #[serde(default)]
    pub timezone: String,
}

impl ClientEnvironment {
    /// Combine the request's `User-Agent` header with body-supplied screen and
    /// timezone signals.
    #[must_use]
    pub fn from_parts(user_agent: Option<&str>, screen: &ScreenSignals) -> Self {
        Self {
            user_agent: user_agent.unwrap_or_default().to_owned(),
            screen_width: screen.screen_width.map(|w| w.to_string()).unwrap_or_default(),
            screen_height: screen.screen_height.map(|h| h.to_string()).unwrap_or_default(),
            timezone: screen.timezone.clone().unwrap_or_default(),
        }
    }

    fn signature(&self) -> String {
        format!("{}|{}x{}|{}", self.user_agent, self.screen_width, self.screen_height, self.timezone)
    }
}

/// Browser-side signals carried in JSON request bodies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScreenSignals {
    #[serde(default)]
    pub screen_width: Option<u32>,
    #[serde(default)]
    pub screen_height: Option<u32>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Opaque client identifier. Stored in the `ip_address` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientIdentifier(String);

impl ClientIdentifier {
    /// Derive the identifier from environment signals.
    #[must_use]
    pub fn derive(env: &ClientEnvironment) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(env.signature().as_bytes());
        let hex = hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<String>();
        debug_assert_eq!(hex.len(), SHA256_HEX_LEN);
        Self(hex[..IDENTIFIER_LEN].to_owned())
    }

    /// Wrap an identifier read back from the store.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "fingerprint_test.rs"]
mod tests;
