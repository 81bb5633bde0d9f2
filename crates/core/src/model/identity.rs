use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticated user as the core sees it: a display name plus the
/// stable unique email the storage partition key is derived from.
///
/// Credentials never reach this type; the authentication collaborator
/// hands over an `Identity` and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    name: String,
    email: String,
}

impl Identity {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Storage partition key for one identity (or the guest session).
///
/// User keys are prefixed so they can never collide with the fixed
/// guest key, and the email is normalized so the same account always
/// maps to the same partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionKey(String);

impl PartitionKey {
    const GUEST: &'static str = "guest";

    /// The fixed well-known partition used when nobody is signed in.
    #[must_use]
    pub fn guest() -> Self {
        Self(Self::GUEST.to_owned())
    }

    /// Partition for a signed-in identity.
    #[must_use]
    pub fn for_identity(identity: &Identity) -> Self {
        Self(format!("user:{}", identity.email().trim().to_lowercase()))
    }

    /// Partition for the active identity, guest when none is supplied.
    #[must_use]
    pub fn from_active(identity: Option<&Identity>) -> Self {
        identity.map_or_else(Self::guest, Self::for_identity)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
