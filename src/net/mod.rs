//! Network layer subsystem.
//!
//! TLS is optional; when `listener.tls` is set the HTTP server hands the
//! bound listener to `axum-server` with the certificate loaded here.

pub mod tls;
