mod handlers;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::case::CaseStore;

pub use handlers::{CreateZoneInput, SaveCaseResponse, SetShapeInput};

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    }
}

/// Builds the HTTP API the designer GUI talks to. Any origin is allowed
/// unless `cors_origins` is given.
pub fn create_router(store: CaseStore, cors_origins: Option<&[String]>) -> Router {
    let api = Router::new()
        // Inlet/Outlet configuration
        .route("/inout", get(handlers::get_inout))
        .route("/inout/settings", put(handlers::save_settings))
        .route("/inout/xml", get(handlers::render_xml))
        // Zones
        .route("/inout/zones", get(handlers::list_zones))
        .route("/inout/zones", post(handlers::create_zone))
        .route("/inout/zones/{id}", get(handlers::get_zone))
        .route("/inout/zones/{id}", delete(handlers::delete_zone))
        .route("/inout/zones/{id}/shape", put(handlers::set_zone_shape))
        .route("/inout/zones/{id}/geometry", put(handlers::save_geometry))
        .route("/inout/zones/{id}/direction", put(handlers::save_direction))
        .route("/inout/zones/{id}/rotation", put(handlers::save_rotation))
        .route("/inout/zones/{id}/policy", put(handlers::save_policy))
        .route("/inout/zones/{id}/velocity", put(handlers::save_velocity))
        .route("/inout/zones/{id}/density", put(handlers::save_density))
        .route("/inout/zones/{id}/elevation", put(handlers::save_elevation))
        // Case file
        .route("/case/save", post(handlers::save_case))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(store)
}
