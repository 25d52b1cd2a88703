//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Deployment environment (controls the `Secure` cookie attribute).
    pub environment: Environment,

    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Backend API the gateway forwards to.
    pub backend: BackendConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Navigation gate settings.
    pub gate: GateConfig,

    /// Static frontend served behind the gate.
    pub frontend: FrontendConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Origin (and optional base path) of the backend API.
    /// Unset means every endpoint that needs it answers 500.
    pub base_url: Option<String>,

    /// Backend path of the login endpoint.
    pub login_path: String,

    /// JSON pointer to the access token inside the login payload.
    pub token_pointer: String,

    /// Backend path of the public category listing.
    pub categories_path: String,

    /// Backend path for avatar uploads.
    pub avatar_upload_path: String,

    /// Backend path for generic image uploads.
    pub image_upload_path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            login_path: "/auth/login".to_string(),
            token_pointer: "/data/accessToken".to_string(),
            categories_path: "/categories".to_string(),
            avatar_upload_path: "/upload/avatar".to_string(),
            image_upload_path: "/upload/image".to_string(),
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the bearer token.
    pub cookie_name: String,

    /// Cookie lifetime in seconds.
    pub max_age_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "token".to_string(),
            max_age_secs: 60 * 60 * 24 * 7,
        }
    }
}

/// Route gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Login entry point.
    pub login_path: String,

    /// Where an authenticated visitor of the login page is sent.
    pub landing_path: String,

    /// Path prefixes that require a session.
    pub protected_prefixes: Vec<String>,

    /// Path prefixes the gate never looks at.
    pub excluded_prefixes: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        let protected = [
            "/dashboard",
            "/inventory",
            "/products",
            "/categories",
            "/orders",
            "/customers",
            "/finance",
            "/marketing",
            "/users",
            "/roles",
            "/settings",
        ];
        let excluded = ["/api", "/_next/static", "/_next/image", "/favicon.ico"];

        Self {
            login_path: "/login".to_string(),
            landing_path: "/dashboard".to_string(),
            protected_prefixes: protected.iter().map(|p| p.to_string()).collect(),
            excluded_prefixes: excluded.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Static frontend configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Directory with the built dashboard. Pages 404 when unset.
    pub static_dir: Option<String>,
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
