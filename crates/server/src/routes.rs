use std::path::Path;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use common::types::Health;

use crate::openapi;
use crate::state::ServerState;

pub mod auth;
pub mod content;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses(
        (status = 200, description = "OK", body = crate::openapi::HealthResponse)
    )
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// CORS for the listed origins, with credentials so the session cookie travels.
pub fn build_cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

const CONTENT_SECURITY_POLICY: &str = "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
form-action 'self';frame-ancestors 'self';img-src 'self' data:;object-src 'none';script-src 'self';\
script-src-attr 'none';style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests";

const STRICT_TRANSPORT_SECURITY: &str = "max-age=31536000; includeSubDomains";

/// Hardening headers set on every response unless a handler already did.
/// HSTS and CSP are production-only.
pub fn security_headers(router: Router, production: bool) -> Router {
    let always = [
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
        (header::REFERRER_POLICY, "no-referrer"),
    ];
    let production_only = [
        (header::STRICT_TRANSPORT_SECURITY, STRICT_TRANSPORT_SECURITY),
        (header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY),
    ];

    let mut router = always.into_iter().fold(router, with_default_header);
    if production {
        router = production_only.into_iter().fold(router, with_default_header);
    }
    router
}

fn with_default_header(router: Router, (name, value): (HeaderName, &'static str)) -> Router {
    router.layer(SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value)))
}

/// Build the full application router: public reads, session-gated
/// mutations and the static page fallback.
pub fn build_router(state: ServerState, cors: CorsLayer, static_dir: &str, production: bool) -> Router {
    let index = Path::new(static_dir).join("index.html");
    let static_files = ServeDir::new(static_dir).fallback(ServeFile::new(index));

    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/content", get(content::get_content));

    let gated = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/content/blocks", put(content::update_blocks))
        .route("/content/services", post(content::create_service))
        .route("/content/services/:id", put(content::update_service).delete(content::delete_service))
        .route("/content/settings", put(content::update_settings))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_session));

    let app = public
        .merge(gated)
        .fallback_service(static_files)
        .with_state(state)
        .layer(CompressionLayer::new());

    security_headers(app, production)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
