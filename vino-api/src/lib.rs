use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod error;
pub mod health;
pub mod middleware;
pub mod products;
pub mod state;

pub use state::{AdminAuth, AppState};

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.frontend_origin.clone());

    Router::new()
        .merge(health::routes())
        .merge(products::routes())
        .merge(admin::routes(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin without credentials, or exactly the configured frontend with credentials.
fn cors_layer(frontend_origin: Option<HeaderValue>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-admin-token"),
        ]);

    match frontend_origin {
        Some(origin) => cors
            .allow_origin(AllowOrigin::exact(origin))
            .allow_credentials(true),
        None => cors.allow_origin(tower_http::cors::Any),
    }
}
