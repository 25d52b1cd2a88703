//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs, paths and value ranges
//! - Detect a login page that the gate itself would protect
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;
use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Some(base) = &config.backend.base_url {
        match Url::parse(base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "backend.base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new("backend.base_url", e.to_string())),
        }
    }

    let paths = [
        ("backend.login_path", &config.backend.login_path),
        ("backend.categories_path", &config.backend.categories_path),
        ("backend.avatar_upload_path", &config.backend.avatar_upload_path),
        ("backend.image_upload_path", &config.backend.image_upload_path),
        ("gate.login_path", &config.gate.login_path),
        ("gate.landing_path", &config.gate.landing_path),
    ];
    for (field, path) in paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(field, format!("'{}' must start with '/'", path)));
        }
    }

    for prefix in config
        .gate
        .protected_prefixes
        .iter()
        .chain(config.gate.excluded_prefixes.iter())
    {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::new(
                "gate",
                format!("prefix '{}' must start with '/'", prefix),
            ));
        }
    }

    let pointer = &config.backend.token_pointer;
    if !pointer.is_empty() && !pointer.starts_with('/') {
        errors.push(ValidationError::new(
            "backend.token_pointer",
            "JSON pointer must be empty or start with '/'",
        ));
    }

    if config.session.cookie_name.trim().is_empty() {
        errors.push(ValidationError::new("session.cookie_name", "must not be empty"));
    }

    if config.session.max_age_secs == 0 {
        errors.push(ValidationError::new("session.max_age_secs", "must be greater than 0"));
    }

    let login_is_protected = config
        .gate
        .protected_prefixes
        .iter()
        .any(|p| PathPrefixMatcher::new(p.as_str()).matches(&config.gate.login_path));
    if login_is_protected {
        errors.push(ValidationError::new(
            "gate.login_path",
            "login page cannot sit under a protected prefix",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
