//! Caller identification from request headers.
//!
//! The user id is taken from a configurable header set by the fronting
//! gateway. When a shared secret is configured the request must also carry
//! `Authorization: Bearer <secret>`, compared in constant time.

use axum::http::{HeaderMap, HeaderName, header::AUTHORIZATION, header::InvalidHeaderName};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::chat::domain::{Identity, UserId};

/// How callers are identified.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    user_header: HeaderName,
    shared_secret: Option<SecretString>,
}

impl AuthSettings {
    /// Creates settings reading the user id from `user_header`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHeaderName`] when `user_header` is not a valid
    /// header name.
    pub fn new(
        user_header: &str,
        shared_secret: Option<SecretString>,
    ) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            user_header: HeaderName::try_from(user_header)?,
            shared_secret,
        })
    }

    /// Resolves the caller, or `None` when the request is anonymous or
    /// fails the shared-secret check.
    #[must_use]
    pub fn identify(&self, headers: &HeaderMap) -> Option<Identity> {
        if let Some(secret) = &self.shared_secret {
            let presented = headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(bearer_token)?;
            if !bool::from(presented.as_bytes().ct_eq(secret.expose_secret().as_bytes())) {
                return None;
            }
        }

        headers
            .get(&self.user_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(|user| Identity::new(UserId::new(user)))
    }
}

fn bearer_token(value: &str) -> Option<&str> {
    value.strip_prefix("Bearer ")
}
