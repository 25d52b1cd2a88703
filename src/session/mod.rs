//! Session credential store.
//!
//! The bearer token lives only in an HTTP-only cookie. Handlers receive a
//! [`Session`] extractor built from the request's cookie jar and hand it
//! back as response parts when they change it, so the cookie is the sole
//! transport and nothing is held in process memory between requests.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::{Environment, SessionConfig};

/// Cookie attributes for the session credential.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    cookie_name: String,
    max_age: time::Duration,
    secure: bool,
}

impl SessionPolicy {
    pub fn from_config(config: &SessionConfig, environment: Environment) -> Self {
        Self {
            cookie_name: config.cookie_name.clone(),
            max_age: time::Duration::seconds(i64::try_from(config.max_age_secs).unwrap_or(i64::MAX)),
            secure: environment.is_production(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    fn issue(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), token))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(self.max_age)
            .path("/")
            .build()
    }

    fn expire(&self) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), String::new()))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::ZERO)
            .path("/")
            .build()
    }
}

/// Bearer token read from the session cookie.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Per-request view of the credential store.
#[derive(Debug, Clone)]
pub struct Session {
    jar: CookieJar,
    policy: Arc<SessionPolicy>,
}

impl Session {
    pub fn new(jar: CookieJar, policy: Arc<SessionPolicy>) -> Self {
        Self { jar, policy }
    }

    /// Current token, if a non-empty one is present.
    pub fn token(&self) -> Option<&str> {
        self.jar
            .get(self.policy.cookie_name())
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty())
    }

    pub fn credential(&self) -> Option<Credential> {
        self.token().map(|token| Credential(token.to_string()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Store a freshly issued token.
    pub fn establish(self, token: impl Into<String>) -> Self {
        let cookie = self.policy.issue(token.into());
        Self {
            jar: self.jar.add(cookie),
            policy: self.policy,
        }
    }

    /// Drop the credential. Always emits an expiring cookie.
    pub fn clear(self) -> Self {
        let cookie = self.policy.expire();
        Self {
            jar: self.jar.add(cookie),
            policy: self.policy,
        }
    }
}

impl<S> FromRequestParts<S> for Session
where
    Arc<SessionPolicy>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Session::new(jar, Arc::<SessionPolicy>::from_ref(state)))
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}
