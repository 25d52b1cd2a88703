//! Upstream (backend API) subsystem.
//!
//! # Data Flow
//! ```text
//! Handler
//!     → types.rs (ForwardedRequest / LoginCredentials)
//!     → client.rs (compose URL, attach token + request ID, send)
//!     → BackendReply { status, body }
//!     → http/response.rs (relay to browser)
//! ```

pub mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{BackendReply, ForwardedRequest, LoginCredentials};
