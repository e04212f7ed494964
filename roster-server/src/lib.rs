//! roster-server: HTTP API over the employee record store
//!
//! Translates requests into `roster-core` operations and core error kinds
//! into status codes. Holds no business rules of its own.

pub mod http;
pub mod state;

pub use http::{build_router, run_server, ApiError, ServerConfig, ServerError};
pub use state::AppState;
