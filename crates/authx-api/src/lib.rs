//! AuthX API: HTTP surface over the tenant registry, configuration store,
//! account and tenant-user authentication flows.
//!
//! [`build_router`] returns a ready [`axum::Router`]; the server binary
//! only binds it to a socket.

mod error;
mod extract;
mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// Assemble every route with request tracing.
pub fn build_router(state: AppState) -> Router {
    routes::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
