//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (request ID)
//!     → routing/gate.rs (page navigation gate)
//!     → handlers/* (login, proxy, uploads, ...)
//!     → response.rs (envelope, relay)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use response::Envelope;
pub use server::{AppState, HttpServer};
