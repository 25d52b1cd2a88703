//! HTTP endpoints under `/api`.
//!
//! | Route | Handler |
//! |---|---|
//! | `POST /api/auth/login` | [`auth::login`] |
//! | `POST /api/auth/logout` | [`auth::logout`] |
//! | `GET /api/auth/session` | [`auth::session_status`] |
//! | `GET/POST/PUT/PATCH/DELETE /api/proxy/{*path}` | [`proxy::forward`] |
//! | `GET /api/categories` | [`public::categories`] |
//! | `POST /api/upload/avatar` | [`upload::avatar`] |
//! | `POST /api/upload/image` | [`upload::image`] |
//! | `GET /api/health` | [`status::health`] |
//!
//! Every handler returns `Result<_, GatewayError>`; the error's
//! `IntoResponse` renders the shared failure envelope.

pub mod auth;
pub mod proxy;
pub mod public;
pub mod status;
pub mod upload;
