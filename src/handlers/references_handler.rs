use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::{
    models::{JobPosition, NamedEntity, Store},
    query::{self, EntityQuery},
    AppResult, AppState,
};

/// GET /api/employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Active employees", body = Vec<NamedEntity>),
        (status = 500, description = "Failed to fetch employees")
    ),
    tag = "references"
)]
pub async fn get_employees(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<NamedEntity>>> {
    let employees = query::list(&state.db, &EntityQuery::EMPLOYEES, None).await?;
    Ok(Json(employees))
}

/// GET /api/job-positions
#[utoipa::path(
    get,
    path = "/api/job-positions",
    responses(
        (status = 200, description = "Job positions (at most 50)", body = Vec<JobPosition>),
        (status = 500, description = "Failed to fetch job positions")
    ),
    tag = "references"
)]
pub async fn get_job_positions(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<JobPosition>>> {
    let positions = query::list(&state.db, &EntityQuery::JOB_POSITIONS, None).await?;
    Ok(Json(positions))
}

/// GET /api/principals
#[utoipa::path(
    get,
    path = "/api/principals",
    responses(
        (status = 200, description = "Principal organizations", body = Vec<NamedEntity>),
        (status = 500, description = "Failed to fetch principals")
    ),
    tag = "references"
)]
pub async fn get_principals(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<NamedEntity>>> {
    let principals = query::list(&state.db, &EntityQuery::PRINCIPALS, None).await?;
    Ok(Json(principals))
}

/// GET /api/roles
#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "Active roles", body = Vec<NamedEntity>),
        (status = 500, description = "Failed to fetch roles")
    ),
    tag = "references"
)]
pub async fn get_roles(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<NamedEntity>>> {
    let roles = query::list(&state.db, &EntityQuery::ROLES, None).await?;
    Ok(Json(roles))
}

/// GET /api/warehouses
#[utoipa::path(
    get,
    path = "/api/warehouses",
    responses(
        (status = 200, description = "Warehouse organizations", body = Vec<NamedEntity>),
        (status = 500, description = "Failed to fetch warehouses")
    ),
    tag = "references"
)]
pub async fn get_warehouses(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<NamedEntity>>> {
    let warehouses = query::list(&state.db, &EntityQuery::WAREHOUSES, None).await?;
    Ok(Json(warehouses))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StoreSearchQuery {
    /// Matched case-insensitively against name, alias and legal name
    pub search: Option<String>,
}

/// GET /api/stores?search=
#[utoipa::path(
    get,
    path = "/api/stores",
    params(StoreSearchQuery),
    responses(
        (status = 200, description = "Active stores (at most 100)", body = Vec<Store>),
        (status = 500, description = "Failed to fetch stores")
    ),
    tag = "references"
)]
pub async fn get_stores(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StoreSearchQuery>,
) -> AppResult<Json<Vec<Store>>> {
    let stores = query::list(&state.db, &EntityQuery::STORES, params.search.as_deref()).await?;
    Ok(Json(stores))
}
