use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{cli::Cli, routes, AppState};

pub const SERVICE_WORKER_PATH: &str = "/service_worker.js";

/// Builds the full application: api routes, static assets if configured,
/// CORS and request tracing
pub fn app(state: AppState, args: &Cli) -> Result<Router, anyhow::Error> {
    let mut router: Router<AppState> = routes::router();

    if let Some(assets_dir) = &args.assets_dir {
        router = router
            // Add the header to allow service worker in non-root path to set a root scope
            .route_service(
                SERVICE_WORKER_PATH,
                ServiceBuilder::new()
                    .layer(SetResponseHeaderLayer::if_not_present(
                        HeaderName::from_static("service-worker-allowed"),
                        HeaderValue::from_static("/"),
                    ))
                    .service(ServeFile::new(
                        assets_dir.join(SERVICE_WORKER_PATH.trim_start_matches('/')),
                    )),
            )
            .fallback_service(ServeDir::new(assets_dir));
    }

    Ok(router
        .layer(cors_layer(&args.cors_origin)?)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state))
}

fn cors_layer(origin: &str) -> Result<CorsLayer, anyhow::Error> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(if origin == "*" {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origin.parse::<HeaderValue>()?)
    })
}
