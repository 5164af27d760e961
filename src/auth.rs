//! Session context and credential providers.
//!
//! A [`Session`] is created at login and passed to every store call. Before
//! each request the store asks the session for a bearer token, which the
//! session gets from its [`CredentialProvider`]. Once invalidated (logout) a
//! session refuses to hand out tokens.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::error::{PosError, Result};
use crate::models::User;

/// Supplies an OAuth access token for the spreadsheet API.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns a currently valid token, or [`PosError::AuthorizationDenied`].
    async fn access_token(&self) -> Result<String>;
}

/// A token obtained out of band (e.g. pasted from a consent flow).
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken")
            .field("token_len", &self.token.len())
            .finish()
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn access_token(&self) -> Result<String> {
        if self.token.trim().is_empty() {
            return Err(PosError::AuthorizationDenied(
                "no access token configured".to_string(),
            ));
        }
        Ok(self.token.clone())
    }
}

/// Reads the token from an environment variable on every request, so an
/// external refresher can rotate it.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl CredentialProvider for EnvToken {
    async fn access_token(&self) -> Result<String> {
        match std::env::var(&self.var) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => {
                warn!("Environment variable {} not set", self.var);
                Err(PosError::AuthorizationDenied(format!(
                    "set {} to a valid access token and sign in again",
                    self.var
                )))
            }
        }
    }
}

/// An authenticated session.
pub struct Session {
    id: Uuid,
    user: Option<User>,
    provider: Arc<dyn CredentialProvider>,
    active: AtomicBool,
}

impl Session {
    /// Opens a session backed by `provider`.
    pub fn acquire(provider: Arc<dyn CredentialProvider>) -> Self {
        let id = Uuid::new_v4();
        info!("Session {id} acquired");
        Self {
            id,
            user: None,
            provider,
            active: AtomicBool::new(true),
        }
    }

    /// Attaches the signed-in user.
    pub fn with_user(mut self, user: User) -> Self {
        debug!("Session {} bound to {}", self.id, user.email);
        self.user = Some(user);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Logs out. Every later token request fails.
    pub fn invalidate(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            info!("Session {} invalidated", self.id);
        }
    }

    /// Token for the next request.
    pub async fn bearer_token(&self) -> Result<String> {
        if !self.is_active() {
            return Err(PosError::AuthorizationDenied(
                "session has been closed, sign in again".to_string(),
            ));
        }
        self.provider.access_token().await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("user", &self.user.as_ref().map(|u| &u.email))
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn session(token: &str) -> Session {
        Session::acquire(Arc::new(StaticToken::new(token)))
    }

    #[test]
    fn static_token_is_returned() {
        let session = session("abc");
        assert_eq!(tokio_test::block_on(session.bearer_token()).unwrap(), "abc");
    }

    #[test]
    fn empty_static_token_is_denied() {
        let session = session("  ");
        let err = tokio_test::block_on(session.bearer_token()).unwrap_err();
        assert!(err.is_authorization());
    }

    #[test]
    fn invalidated_session_is_denied() {
        let session = session("abc");
        session.invalidate();
        assert!(!session.is_active());
        let err = tokio_test::block_on(session.bearer_token()).unwrap_err();
        assert!(matches!(err, PosError::AuthorizationDenied(_)));
    }

    #[test]
    fn missing_env_token_is_denied() {
        let provider = EnvToken::new("PHONE_SHOP_POS_TEST_TOKEN_THAT_IS_NEVER_SET");
        let err = tokio_test::block_on(provider.access_token()).unwrap_err();
        assert!(err.to_string().contains("PHONE_SHOP_POS_TEST_TOKEN_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn user_is_attached() {
        let user = User {
            id: 1,
            email: "ana@shop.test".to_string(),
            full_name: "Ana".to_string(),
            role: Role::Seller,
        };
        let session = session("abc").with_user(user.clone());
        assert_eq!(session.user(), Some(&user));
    }

    #[test]
    fn debug_does_not_leak_token() {
        let rendered = format!("{:?}", StaticToken::new("secret-token"));
        assert!(!rendered.contains("secret-token"));
    }
}
