use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::{
    models::{CreateRouteInput, Route, RouteDashboard, RouteSummary},
    query::{self, EntityQuery},
    AppResult, AppState,
};

/// GET /api/routes
#[utoipa::path(
    get,
    path = "/api/routes",
    responses(
        (status = 200, description = "Routes, newest first", body = Vec<RouteSummary>),
        (status = 500, description = "Failed to fetch routes")
    ),
    tag = "routes"
)]
pub async fn get_routes(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<RouteSummary>>> {
    let routes = query::list(&state.db, &EntityQuery::ROUTES, None).await?;
    Ok(Json(routes))
}

/// POST /api/routes
#[utoipa::path(
    post,
    path = "/api/routes",
    request_body = CreateRouteInput,
    responses(
        (status = 201, description = "Route created", body = Route),
        (status = 500, description = "Failed to create route")
    ),
    tag = "routes"
)]
pub async fn create_route(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateRouteInput>,
) -> AppResult<(StatusCode, Json<Route>)> {
    let route = query::insert_route(&state.db, &input).await?;
    Ok((StatusCode::CREATED, Json(route)))
}

/// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Route counts and the latest routes", body = RouteDashboard),
        (status = 500, description = "Failed to fetch dashboard")
    ),
    tag = "routes"
)]
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> AppResult<Json<RouteDashboard>> {
    Ok(Json(query::dashboard(&state.db).await?))
}
