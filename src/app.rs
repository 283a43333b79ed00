use crate::app_state::AppState;
use crate::routes;
use axum::Router;
use http::header;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{ServiceBuilderExt, propagate_header::PropagateHeaderLayer};

pub fn create_app() -> eyre::Result<Router> {
    let app_state = AppState::init()?;

    Ok(create_router(app_state))
}

pub fn create_router(app_state: AppState) -> Router {
    let router = Router::new()
        .nest("/health", routes::health::route::create_route())
        .with_state(app_state);

    let sensitive_headers: Arc<[_]> = vec![header::AUTHORIZATION, header::COOKIE].into();

    let middleware = ServiceBuilder::new()
        .layer(PropagateHeaderLayer::new(header::HeaderName::from_static(
            "x-request-id",
        )))
        .sensitive_request_headers(sensitive_headers.clone())
        .trace_for_http()
        .sensitive_response_headers(sensitive_headers);

    router.layer(middleware)
}
