use crate::error::FrontError;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use configuration::MIN_SESSION_KEY_LEN;
use core_types::{Capability, Role};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

pub const SESSION_COOKIE: &str = "fleetbook_session";

/// Who is making the request. Handlers receive it as an extractor and
/// check capabilities against it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    /// Fails with 403 unless the session's role grants `capability`.
    pub fn require(&self, capability: Capability) -> Result<(), FrontError> {
        if self.role.grants(capability) {
            Ok(())
        } else {
            tracing::warn!(username = %self.username, role = %self.role, ?capability, "Access denied.");
            Err(FrontError::Forbidden)
        }
    }

    /// Stores the session in the jar; the returned jar must be part of the response.
    pub fn store(&self, jar: PrivateCookieJar) -> Result<PrivateCookieJar, FrontError> {
        let value = serde_json::to_string(self).map_err(|e| FrontError::Internal(e.to_string()))?;
        let cookie = Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        Ok(jar.add(cookie))
    }

    pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }

    fn from_jar(jar: &PrivateCookieJar) -> Option<Self> {
        let cookie = jar.get(SESSION_COOKIE)?;
        serde_json::from_str(cookie.value()).ok()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = FrontError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .map_err(|never: Infallible| -> FrontError { match never {} })?;
        Session::from_jar(&jar).ok_or(FrontError::LoginRequired)
    }
}

/// Builds the cookie key from the configured secret, or a random one.
pub fn session_key(secret: Option<&str>) -> Result<Key, FrontError> {
    match secret {
        Some(secret) => Key::try_from(secret.as_bytes()).map_err(|_| {
            FrontError::Internal(format!("session_key must be at least {MIN_SESSION_KEY_LEN} bytes"))
        }),
        None => {
            tracing::warn!("No session_key configured; sessions will not survive a restart.");
            Ok(Key::generate())
        }
    }
}
