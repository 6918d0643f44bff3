mod handlers;
pub mod middleware;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::engine::Engine;

pub use handlers::{ResetResponse, WaterResponse, RESET_REPLY, WATER_REPLY};
pub use middleware::{Access, SecurityConfig};

pub fn create_router(engine: Engine, security: SecurityConfig) -> Router {
    let member = Router::new()
        .route("/plant", get(handlers::get_plant))
        .route("/commands/water", post(handlers::water))
        .route_layer(from_fn_with_state(
            security.clone(),
            middleware::require_member,
        ));

    let admin = Router::new()
        .route("/commands/reset", post(handlers::reset))
        .route_layer(from_fn_with_state(security, middleware::require_admin));

    let api = Router::new()
        .merge(member)
        .merge(admin)
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(engine)
}
