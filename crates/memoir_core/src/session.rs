//! Identity/session collaborator contract.
//!
//! The identity provider itself is external; core only needs the signed-in
//! user id and a short-lived bearer token for writes.

use std::fmt::{Debug, Formatter};

/// Opaque bearer token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Returns `None` for blank tokens.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Supplies the current user and token.
pub trait SessionProvider {
    /// `None` when nobody is signed in.
    fn user_id(&self) -> Option<String>;
    /// `None` when no token can be issued right now.
    fn access_token(&self) -> Option<AccessToken>;
}

impl<T: SessionProvider + ?Sized> SessionProvider for &T {
    fn user_id(&self) -> Option<String> {
        (**self).user_id()
    }

    fn access_token(&self) -> Option<AccessToken> {
        (**self).access_token()
    }
}

/// Fixed session for embedding hosts that resolve identity themselves.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user_id: Option<String>,
    token: Option<AccessToken>,
}

impl StaticSession {
    pub fn new(user_id: Option<String>, token: Option<AccessToken>) -> Self {
        Self {
            user_id: user_id.filter(|id| !id.trim().is_empty()),
            token,
        }
    }

    pub fn signed_in(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self::new(Some(user_id.into()), AccessToken::new(token))
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

impl SessionProvider for StaticSession {
    fn user_id(&self) -> Option<String> {
        self.user_id.clone()
    }

    fn access_token(&self) -> Option<AccessToken> {
        self.token.clone()
    }
}
