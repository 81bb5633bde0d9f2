use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback icon used when a key does not resolve.
pub const DEFAULT_ICON: &str = "TargetIcon";

// Keys the externally-owned icon registry is known to render.
const KNOWN_ICONS: &[&str] = &[
    "BrainIcon",
    "CalculatorIcon",
    "BookOpenIcon",
    "MessageSquareIcon",
    DEFAULT_ICON,
];

/// Opaque key into the externally-owned icon registry.
///
/// Keys are accepted as-is at construction; an unknown key degrades to
/// [`DEFAULT_ICON`] at resolution time, never to an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconKey(String);

impl IconKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key as supplied by the caller.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves against the fixed registry, falling back to the default
    /// icon for unknown keys.
    #[must_use]
    pub fn resolve(&self) -> &str {
        KNOWN_ICONS
            .iter()
            .copied()
            .find(|known| *known == self.0)
            .unwrap_or(DEFAULT_ICON)
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_key_resolves_to_itself() {
        assert_eq!(IconKey::new("BrainIcon").resolve(), "BrainIcon");
    }

    #[test]
    fn unknown_key_falls_back_to_default() {
        assert_eq!(IconKey::new("NoSuchIcon").resolve(), DEFAULT_ICON);
        assert_eq!(IconKey::new("").resolve(), DEFAULT_ICON);
    }

    #[test]
    fn raw_key_is_preserved() {
        let key = IconKey::new("NoSuchIcon");
        assert_eq!(key.as_str(), "NoSuchIcon");
    }
}
