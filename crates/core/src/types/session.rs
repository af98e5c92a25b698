//! Opaque session key correlating anonymous browsing state.

use serde::{Deserialize, Serialize};

/// Opaque per-browser identifier.
///
/// Correlates cart and bookmark state across requests. It is not a login
/// identity: the surrounding web layer issues it as a cookie, and the only
/// thing this crate ever does with it is use it as a cache partition key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    /// Wrap a raw session key.
    #[must_use]
    pub const fn new(key: String) -> Self {
        Self(key)
    }

    /// Borrow the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for SessionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}
