//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Page navigation (path, session cookie)
//!     → gate.rs (classify path, check credential presence)
//!     → matcher.rs (evaluate prefix conditions)
//!     → Pass | redirect to login | redirect to landing
//!
//! Gate Compilation (at startup):
//!     GateConfig
//!     → Compile prefix matchers
//!     → Freeze as immutable RouteGate
//! ```
//!
//! # Design Decisions
//! - Gate compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Never contacts the backend

pub mod gate;
pub mod matcher;

pub use gate::{route_gate_middleware, GateDecision, RouteGate};
