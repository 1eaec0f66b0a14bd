use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use katalog_core::api::routes::api;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, catalog, images, logs},
    infra::{app_state::AppState, config::Config, middleware::require_admin},
};

/// Every `/api/*` route. Write routes and the audit log sit behind the admin
/// session check.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route(api::items::ADD, post(catalog::add_item))
        .route(api::items::DELETE, post(catalog::delete_item))
        .route(api::logs::LIST, get(logs::list_logs))
        .route(api::logs::CLEAR, post(logs::clear_logs))
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    Router::new()
        .route(api::items::LIST, get(catalog::list_items))
        .route(api::items::IMAGE, get(images::get_image))
        .route(api::auth::LOGIN, post(auth::login))
        .route(api::auth::LOGOUT, get(auth::logout).post(auth::logout))
        .route(api::auth::CHECK_ADMIN, get(auth::check_admin))
        .merge(admin)
}

/// API routes plus static assets, CORS and request tracing.
pub fn create_app(state: AppState) -> Router {
    let mut router = create_api_router(state.clone());

    if let Some(dir) = state.config().server.static_dir.as_ref() {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(state.config())),
        )
        .with_state(state)
}

/// Permissive in dev, allow-list otherwise (any origin when the list is
/// empty).
fn cors_layer(config: &Config) -> CorsLayer {
    if config.dev_mode {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter(|origin| origin.trim() != "*")
        .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
