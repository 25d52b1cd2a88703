//! Navigation gate.
//!
//! Decides, before any page is served, whether a navigation passes, goes to
//! the login page, or leaves the login page for the landing page. Only the
//! presence of a session credential is considered; token validity is the
//! backend's business.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use url::form_urlencoded;

use crate::config::GateConfig;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::matcher::{AnyMatcher, Matcher};
use crate::session::Session;

/// Outcome of a gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    /// Protected path without a credential. Carries the login location.
    RedirectToLogin(String),
    /// Login page with a credential. Carries the landing location.
    RedirectToLanding(String),
}

/// Compiled gate rules. Immutable after construction.
#[derive(Debug)]
pub struct RouteGate {
    login_path: String,
    landing_path: String,
    protected: AnyMatcher,
    excluded: AnyMatcher,
}

impl RouteGate {
    pub fn from_config(config: &GateConfig) -> Self {
        Self {
            login_path: config.login_path.clone(),
            landing_path: config.landing_path.clone(),
            protected: AnyMatcher::prefixes(config.protected_prefixes.iter().cloned()),
            excluded: AnyMatcher::prefixes(config.excluded_prefixes.iter().cloned()),
        }
    }

    pub fn decide(&self, path: &str, authenticated: bool) -> GateDecision {
        if self.excluded.matches(path) {
            return GateDecision::Pass;
        }

        if !authenticated && self.protected.matches(path) {
            let encoded: String = form_urlencoded::byte_serialize(path.as_bytes()).collect();
            return GateDecision::RedirectToLogin(format!(
                "{}?redirect={}",
                self.login_path, encoded
            ));
        }

        if authenticated && self.is_login_page(path) {
            return GateDecision::RedirectToLanding(self.landing_path.clone());
        }

        GateDecision::Pass
    }

    fn is_login_page(&self, path: &str) -> bool {
        path == self.login_path || path.strip_suffix('/') == Some(self.login_path.as_str())
    }
}

/// Middleware applying the gate to page navigations.
pub async fn route_gate_middleware(
    State(state): State<AppState>,
    session: Session,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    match state.gate.decide(&path, session.is_authenticated()) {
        GateDecision::Pass => next.run(request).await,
        GateDecision::RedirectToLogin(location) => {
            tracing::debug!(path = %path, "Unauthenticated navigation, redirecting to login");
            metrics::record_gate_redirect("login");
            Redirect::temporary(&location).into_response()
        }
        GateDecision::RedirectToLanding(location) => {
            tracing::debug!(path = %path, "Session present on login page, redirecting");
            metrics::record_gate_redirect("landing");
            Redirect::temporary(&location).into_response()
        }
    }
}
