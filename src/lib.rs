//! Plenti admin gateway library.
//!
//! Session-gated backend-for-frontend for the Plenti admin dashboard: login
//! exchange into an HTTP-only cookie, authenticated catch-all forwarding to
//! the backend API, public and upload forwarding, and a navigation gate.

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod session;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
