//! HTTP edge: configuration, auth, middleware, handlers, and server lifecycle.

pub mod auth;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod shutdown;

pub use auth::{AuthError, Authenticator, ScopePolicy};
pub use config::{NetworkConfig, TlsConfig};
pub use handlers::{ApiError, AppState};
pub use module::{build_router, NetworkModule, ResourceServices};
pub use shutdown::{HealthState, InFlightGuard, ShutdownController};
