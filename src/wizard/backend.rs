use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    models::{CreateRouteInput, JobPosition, NamedEntity, ReferenceLists, Route, Store},
    query::{self, EntityQuery},
    AppResult,
};

/// What the wizard needs from the query service.
#[async_trait]
pub trait RouteBackend: Send + Sync {
    async fn list_stores(&self, search: Option<&str>) -> AppResult<Vec<Store>>;

    async fn list_named(&self, listing: &EntityQuery) -> AppResult<Vec<NamedEntity>>;

    async fn list_job_positions(&self) -> AppResult<Vec<JobPosition>>;

    async fn create_route(&self, input: &CreateRouteInput) -> AppResult<Route>;

    /// Load every reference list concurrently. A failed list stays empty.
    async fn reference_lists(&self) -> ReferenceLists {
        let (principals, roles, employees, warehouses, job_positions) = tokio::join!(
            self.list_named(&EntityQuery::PRINCIPALS),
            self.list_named(&EntityQuery::ROLES),
            self.list_named(&EntityQuery::EMPLOYEES),
            self.list_named(&EntityQuery::WAREHOUSES),
            self.list_job_positions(),
        );

        ReferenceLists {
            principals: or_empty("principals", principals),
            roles: or_empty("roles", roles),
            employees: or_empty("employees", employees),
            warehouses: or_empty("warehouses", warehouses),
            job_positions: or_empty("job positions", job_positions),
        }
    }
}

fn or_empty<T>(what: &str, result: AppResult<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Could not load {} for the wizard", what);
        Vec::new()
    })
}

#[async_trait]
impl RouteBackend for PgPool {
    async fn list_stores(&self, search: Option<&str>) -> AppResult<Vec<Store>> {
        query::list(self, &EntityQuery::STORES, search).await
    }

    async fn list_named(&self, listing: &EntityQuery) -> AppResult<Vec<NamedEntity>> {
        query::list(self, listing, None).await
    }

    async fn list_job_positions(&self) -> AppResult<Vec<JobPosition>> {
        query::list(self, &EntityQuery::JOB_POSITIONS, None).await
    }

    async fn create_route(&self, input: &CreateRouteInput) -> AppResult<Route> {
        query::insert_route(self, input).await
    }
}
