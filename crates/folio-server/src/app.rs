//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;

use crate::handlers;
use crate::live_reload;
use crate::middleware::headers;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new();

    if state.live_reload_enabled() {
        router = router.route("/reload", get(live_reload::ws_handler));
    }

    router
        .route("/", get(handlers::pages::serve_path))
        .route("/{*path}", get(handlers::pages::serve_path))
        .layer(
            ServiceBuilder::new()
                .layer(headers::no_store_layer())
                .layer(headers::content_type_options_layer()),
        )
        .with_state(state)
}
