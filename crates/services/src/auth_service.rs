use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use storage::repository::{StorageError, UserRecord, UserRepository};
use syllabus_core::model::Identity;

use crate::error::AuthError;

/// Capability interface for the authentication collaborator.
///
/// The rest of the system only ever sees the resulting opaque
/// [`Identity`]; credentials never cross this boundary. Callers drop the
/// identity (and switch the syllabus back to the guest partition) after
/// a logout.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` if the email is already
    /// registered, or `AuthError::Storage` for repository failures.
    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError>;

    /// Sign in with an existing account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password, or `AuthError::Storage` for repository failures.
    async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Invalidate the session for an identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` for repository failures.
    async fn logout(&self, identity: &Identity) -> Result<(), AuthError>;
}

/// Local identity provider backed by the user repository.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[async_trait]
impl IdentityProvider for AuthService {
    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        let email = normalize_email(email);
        let record = UserRecord {
            name: name.trim().to_owned(),
            email: email.clone(),
            password_hash: hash_password(password),
        };

        match self.users.insert_user(&record).await {
            Ok(()) => Ok(Identity::new(record.name, email)),
            Err(StorageError::Conflict) => Err(AuthError::EmailTaken),
            Err(err) => Err(AuthError::Storage(err)),
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = normalize_email(email);
        let Some(user) = self.users.get_user(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        if user.password_hash != hash_password(password) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(Identity::new(user.name, user.email))
    }

    async fn logout(&self, _identity: &Identity) -> Result<(), AuthError> {
        // No server-side session to revoke; the caller drops the identity.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    fn service() -> AuthService {
        AuthService::new(Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn sign_up_then_login_round_trips_identity() {
        let auth = service();
        let signed_up = auth
            .sign_up("Siddhant", "sid@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(signed_up.email(), "sid@example.com");

        let logged_in = auth.login("sid@example.com", "hunter2").await.unwrap();
        assert_eq!(logged_in, signed_up);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let auth = service();
        auth.sign_up("A", "sid@example.com", "one").await.unwrap();
        let err = auth
            .sign_up("B", "Sid@Example.com ", "two")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let auth = service();
        auth.sign_up("Sid", "sid@example.com", "hunter2")
            .await
            .unwrap();

        let wrong = auth.login("sid@example.com", "letmein").await.unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));

        let unknown = auth.login("nobody@example.com", "hunter2").await.unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_normalizes_email_formatting() {
        let auth = service();
        auth.sign_up("Sid", "Sid@Example.com", "hunter2")
            .await
            .unwrap();
        let identity = auth.login(" sid@example.com ", "hunter2").await.unwrap();
        assert_eq!(identity.email(), "sid@example.com");
    }

    #[tokio::test]
    async fn passwords_are_stored_hashed() {
        let repo = InMemoryRepository::new();
        let auth = AuthService::new(Arc::new(repo.clone()));
        auth.sign_up("Sid", "sid@example.com", "hunter2")
            .await
            .unwrap();

        let stored = repo.get_user("sid@example.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "hunter2");
        assert_eq!(stored.password_hash.len(), 64); // hex sha-256
    }
}
