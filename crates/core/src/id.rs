//! Identifiers for SARMS entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for an active-work session.
///
/// Generated ids look like `s-01J...`; seeded demo sessions use short ids
/// such as `s1`, so the inner value is kept as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh SessionId
    pub fn generate() -> Self {
        Self(format!("s-{}", Ulid::new()))
    }

    /// Wrap an existing id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for SessionId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Normalize a login identifier for keying (trimmed, lowercase).
pub fn normalize_worker_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("s-"));
    }

    #[test]
    fn test_normalize_worker_key() {
        assert_eq!(normalize_worker_key("  W1 "), "w1");
        assert_eq!(normalize_worker_key("w1"), "w1");
    }
}
