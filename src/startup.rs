use axum::{
    extract::Request,
    http::{header, Method},
    middleware::from_fn,
    response::Html,
    routing::{get, patch, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{handlers, middleware, openapi::ApiDoc, AppState};

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    // Reference lists
    let reference_routes = Router::new()
        .route("/employees", get(handlers::references_handler::get_employees))
        .route("/job-positions", get(handlers::references_handler::get_job_positions))
        .route("/principals", get(handlers::references_handler::get_principals))
        .route("/roles", get(handlers::references_handler::get_roles))
        .route("/warehouses", get(handlers::references_handler::get_warehouses))
        .route("/stores", get(handlers::references_handler::get_stores));

    // Routes
    let route_routes = Router::new()
        .route(
            "/routes",
            get(handlers::routes_handler::get_routes).post(handlers::routes_handler::create_route),
        )
        .route("/dashboard", get(handlers::routes_handler::get_dashboard));

    // Wizard sessions
    let wizard_routes = Router::new()
        .route("/", post(handlers::wizard_handler::open_wizard))
        .route(
            "/{id}",
            get(handlers::wizard_handler::get_wizard).delete(handlers::wizard_handler::close_wizard),
        )
        .route("/{id}/next", post(handlers::wizard_handler::next_stage))
        .route("/{id}/previous", post(handlers::wizard_handler::previous_stage))
        .route("/{id}/draft", patch(handlers::wizard_handler::update_draft))
        .route("/{id}/code", post(handlers::wizard_handler::generate_code))
        .route("/{id}/stores/search", post(handlers::wizard_handler::search_stores))
        .route("/{id}/stores/select-all", post(handlers::wizard_handler::select_all_stores))
        .route("/{id}/stores/{uid}/toggle", post(handlers::wizard_handler::toggle_store))
        .route("/{id}/customers/commit", post(handlers::wizard_handler::commit_customers))
        .route(
            "/{id}/customers/{cid}",
            patch(handlers::wizard_handler::update_customer)
                .delete(handlers::wizard_handler::remove_customer),
        )
        .route("/{id}/schedule/selector", put(handlers::wizard_handler::update_selector))
        .route(
            "/{id}/schedule/customers/{cid}/toggle",
            post(handlers::wizard_handler::toggle_schedule_customer),
        )
        .route("/{id}/schedule/assign", post(handlers::wizard_handler::assign_schedule))
        .route("/{id}/submit", post(handlers::wizard_handler::submit_wizard));

    let api_routes = reference_routes.merge(route_routes).nest("/wizard", wizard_routes);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .nest("/api", api_routes)
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/swagger-ui", get(swagger_ui))
        .route_layer(from_fn(middleware::metrics_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                    )
                }))
                .layer(from_fn(middleware::request_id_middleware))
                .layer(cors),
        )
        .with_state(state)
}

async fn swagger_ui() -> Html<&'static str> {
    Html(r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Routeboard API</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({ url: '/api-docs/openapi.json', dom_id: '#swagger-ui' });
        };
    </script>
</body>
</html>
    "#)
}
