//! Parameterized statements against the route database.
//!
//! Every read endpoint is an [`EntityQuery`]: a table, a projection, a fixed
//! filter, optional search columns, an ordering and a row cap. [`list`] runs
//! any of them on one pooled connection.

mod routes;

use sqlx::{postgres::PgRow, FromRow, PgPool};

use crate::{AppError, AppResult};

pub use routes::{dashboard, insert_route, NewRoute};

/// Descriptor of a read-only listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityQuery {
    /// Plural label used in logs and failure messages.
    pub entity: &'static str,
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub filter: Option<&'static str>,
    /// Columns matched case-insensitively against `%term%`.
    pub search_columns: &'static [&'static str],
    pub order_by: &'static str,
    pub limit: Option<u32>,
}

impl EntityQuery {
    pub const EMPLOYEES: EntityQuery = EntityQuery {
        entity: "employees",
        table: "emp",
        columns: &["uid", "name"],
        filter: None,
        search_columns: &[],
        order_by: "name ASC",
        limit: None,
    };

    pub const JOB_POSITIONS: EntityQuery = EntityQuery {
        entity: "job positions",
        table: "job_position",
        columns: &["uid", "designation", "department", "emp_uid"],
        filter: None,
        search_columns: &[],
        order_by: "designation ASC",
        limit: Some(50),
    };

    pub const PRINCIPALS: EntityQuery = EntityQuery {
        entity: "principals",
        table: "org",
        columns: &["uid", "name"],
        filter: Some("is_active = true"),
        search_columns: &[],
        order_by: "name ASC",
        limit: None,
    };

    pub const ROLES: EntityQuery = EntityQuery {
        entity: "roles",
        table: "roles",
        columns: &["uid", "role_name_en AS name"],
        filter: Some("is_active = true"),
        search_columns: &[],
        order_by: "role_name_en ASC",
        limit: None,
    };

    pub const ROUTES: EntityQuery = EntityQuery {
        entity: "routes",
        table: "route",
        columns: &[
            "id::int8 AS id",
            "name AS route",
            "status",
            "role_uid AS role",
            "job_position_uid AS employee_id",
            "org_uid AS organization",
            "code AS assignment",
            "valid_from",
            "valid_upto",
        ],
        filter: Some("is_active = true"),
        search_columns: &[],
        order_by: "created_time DESC",
        limit: None,
    };

    pub const RECENT_ROUTES: EntityQuery = EntityQuery {
        entity: "recent routes",
        limit: Some(5),
        ..EntityQuery::ROUTES
    };

    pub const STORES: EntityQuery = EntityQuery {
        entity: "stores",
        table: "store",
        columns: &[
            "uid",
            "name",
            "alias_name",
            "legal_name",
            "type",
            "status::text AS status",
            "city_uid",
            "state_uid",
            "country_uid",
        ],
        filter: Some("is_active = true"),
        search_columns: &["name", "alias_name", "legal_name"],
        order_by: "name ASC",
        limit: Some(100),
    };

    pub const WAREHOUSES: EntityQuery = EntityQuery {
        entity: "warehouses",
        table: "org",
        columns: &["uid", "name"],
        filter: Some("org_type_uid = 'WAREHOUSE' OR name ILIKE '%warehouse%' OR name ILIKE '%wh%'"),
        search_columns: &[],
        order_by: "name ASC",
        limit: None,
    };

    /// Message reported to clients when the listing fails.
    pub fn failure_message(&self) -> String {
        format!("Failed to fetch {}", self.entity)
    }

    /// Render the statement and its bind values.
    ///
    /// The search term only applies when it is non-empty and the listing has
    /// search columns.
    pub fn render(&self, search: Option<&str>) -> (String, Vec<String>) {
        let mut sql = format!("SELECT {} FROM {}", self.columns.join(", "), self.table);
        let mut conditions = vec![];
        let mut binds = vec![];

        if let Some(filter) = self.filter {
            conditions.push(format!("({})", filter));
        }

        if let Some(term) = search.filter(|t| !t.is_empty()) {
            if !self.search_columns.is_empty() {
                binds.push(format!("%{}%", term));
                let placeholder = format!("${}", binds.len());
                let matches: Vec<String> = self
                    .search_columns
                    .iter()
                    .map(|column| format!("{} ILIKE {}", column, placeholder))
                    .collect();
                conditions.push(format!("({})", matches.join(" OR ")));
            }
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        sql.push_str(" ORDER BY ");
        sql.push_str(self.order_by);

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        (sql, binds)
    }
}

/// Run a listing on one pooled connection and map the rows into `T`.
pub async fn list<T>(db: &PgPool, query: &EntityQuery, search: Option<&str>) -> AppResult<Vec<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let (sql, binds) = query.render(search);
    tracing::debug!(entity = query.entity, search = ?search, "Fetching {}", query.entity);

    let mut conn = db
        .acquire()
        .await
        .map_err(|e| AppError::query(query.failure_message(), e))?;

    let mut statement = sqlx::query_as::<_, T>(&sql);
    for value in binds {
        statement = statement.bind(value);
    }

    let rows = statement
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::query(query.failure_message(), e))?;

    tracing::debug!(entity = query.entity, count = rows.len(), "Fetched {}", query.entity);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_search_matches_three_name_columns() {
        let (sql, binds) = EntityQuery::STORES.render(Some("Market"));

        assert_eq!(
            sql,
            "SELECT uid, name, alias_name, legal_name, type, status::text AS status, city_uid, state_uid, country_uid \
             FROM store WHERE (is_active = true) \
             AND (name ILIKE $1 OR alias_name ILIKE $1 OR legal_name ILIKE $1) \
             ORDER BY name ASC LIMIT 100"
        );
        assert_eq!(binds, vec!["%Market%".to_string()]);
    }

    #[test]
    fn empty_search_is_ignored() {
        let (sql, binds) = EntityQuery::STORES.render(Some(""));

        assert!(!sql.contains("ILIKE"));
        assert!(sql.ends_with("LIMIT 100"));
        assert!(binds.is_empty());
    }

    #[test]
    fn search_is_ignored_for_listings_without_search_columns() {
        let (sql, binds) = EntityQuery::EMPLOYEES.render(Some("ann"));

        assert_eq!(sql, "SELECT uid, name FROM emp ORDER BY name ASC");
        assert!(binds.is_empty());
    }

    #[test]
    fn warehouse_filter_is_parenthesized() {
        let (sql, _) = EntityQuery::WAREHOUSES.render(None);

        assert!(sql.contains(
            "WHERE (org_type_uid = 'WAREHOUSE' OR name ILIKE '%warehouse%' OR name ILIKE '%wh%')"
        ));
    }

    #[test]
    fn routes_listing_renames_columns_newest_first() {
        let (sql, _) = EntityQuery::ROUTES.render(None);

        assert!(sql.contains("name AS route"));
        assert!(sql.contains("code AS assignment"));
        assert!(sql.ends_with("WHERE (is_active = true) ORDER BY created_time DESC"));
    }

    #[test]
    fn recent_routes_reuse_route_projection_with_cap() {
        let (sql, _) = EntityQuery::RECENT_ROUTES.render(None);

        assert!(sql.starts_with("SELECT id::int8 AS id, name AS route"));
        assert!(sql.ends_with("ORDER BY created_time DESC LIMIT 5"));
    }

    #[test]
    fn job_positions_are_capped_at_fifty() {
        let (sql, _) = EntityQuery::JOB_POSITIONS.render(None);
        assert!(sql.ends_with("ORDER BY designation ASC LIMIT 50"));
    }

    #[test]
    fn failure_message_names_the_entity() {
        assert_eq!(EntityQuery::JOB_POSITIONS.failure_message(), "Failed to fetch job positions");
        assert_eq!(EntityQuery::EMPLOYEES.failure_message(), "Failed to fetch employees");
    }
}
