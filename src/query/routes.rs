use chrono::{Days, NaiveDate, NaiveDateTime, Utc};
use metrics::counter;
use sqlx::PgPool;

use super::{list, EntityQuery};
use crate::{
    codes,
    models::{CreateRouteInput, Route, RouteDashboard, RouteSummary},
    AppError, AppResult,
};

const DEFAULT_ROLE: &str = "Admin";
const DEFAULT_JOB_POSITION: &str = "SUPERVISOR";
const DEFAULT_ORG: &str = "EPIC01";
const DEFAULT_STATUS: &str = "Active";
const DEFAULT_VISIT_DURATION: i32 = 30;
const DEFAULT_TRAVEL_TIME: i32 = 15;
const SYSTEM_USER: &str = "ADMIN";

/// Column values for one route insert, after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoute {
    pub uid: String,
    pub code: Option<String>,
    pub name: Option<String>,
    pub role_uid: String,
    pub org_uid: String,
    pub job_position_uid: String,
    pub wh_org_uid: Option<String>,
    pub vehicle_uid: Option<String>,
    pub location_uid: Option<String>,
    pub status: String,
    pub valid_from: NaiveDate,
    pub valid_upto: NaiveDate,
    pub visit_duration: i32,
    pub travel_time: i32,
    pub visit_time: Option<String>,
    pub end_time: Option<String>,
    pub auto_freeze_run_time: Option<String>,
    pub is_customer_with_time: bool,
    pub print_standing: bool,
    pub print_topup: bool,
    pub print_order_summary: bool,
    pub print_forward: bool,
    pub auto_freeze_jp: bool,
    pub add_to_run: bool,
    pub ss: i32,
    pub total_customers: i32,
    pub stamped_at: NaiveDateTime,
}

impl NewRoute {
    /// Resolve an incoming body against the insert defaults.
    ///
    /// Dates that are missing, empty or unparseable fall back to `today` and
    /// `today + 365 days`. The window order is not checked.
    pub fn resolve(input: &CreateRouteInput, uid: String, now: NaiveDateTime) -> Self {
        let today = now.date();

        Self {
            uid,
            code: non_empty(&input.code),
            name: non_empty(&input.name),
            role_uid: non_empty(&input.role_uid).unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            org_uid: non_empty(&input.org_uid).unwrap_or_else(|| DEFAULT_ORG.to_string()),
            job_position_uid: non_empty(&input.job_position_uid)
                .unwrap_or_else(|| DEFAULT_JOB_POSITION.to_string()),
            wh_org_uid: non_empty(&input.wh_org_uid),
            vehicle_uid: non_empty(&input.vehicle_uid),
            location_uid: non_empty(&input.location_uid),
            status: non_empty(&input.status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            valid_from: parse_date(&input.valid_from).unwrap_or(today),
            valid_upto: parse_date(&input.valid_upto)
                .unwrap_or_else(|| today.checked_add_days(Days::new(365)).unwrap_or(today)),
            visit_duration: non_zero(input.visit_duration).unwrap_or(DEFAULT_VISIT_DURATION),
            travel_time: non_zero(input.travel_time).unwrap_or(DEFAULT_TRAVEL_TIME),
            visit_time: non_empty(&input.visit_time),
            end_time: non_empty(&input.end_time),
            auto_freeze_run_time: non_empty(&input.auto_freeze_run_time),
            is_customer_with_time: input.is_customer_with_time.unwrap_or(false),
            print_standing: input.print_standing.unwrap_or(false),
            print_topup: input.print_topup.unwrap_or(false),
            print_order_summary: input.print_order_summary.unwrap_or(false),
            print_forward: input.print_forward.unwrap_or(false),
            auto_freeze_jp: input.auto_freeze_jp.unwrap_or(false),
            add_to_run: input.add_to_run.unwrap_or(false),
            ss: input.ss.unwrap_or(0),
            total_customers: input.total_customers.unwrap_or(0),
            stamped_at: now,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn non_zero(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v != 0)
}

fn parse_date(value: &Option<String>) -> Option<NaiveDate> {
    let raw = non_empty(value)?;
    match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "Ignoring unparseable route date");
            None
        }
    }
}

/// Insert one route row and return it.
pub async fn insert_route(db: &PgPool, input: &CreateRouteInput) -> AppResult<Route> {
    const FAILURE: &str = "Failed to create route";

    let now = Utc::now();
    let uid = codes::route_uid(now.timestamp_millis(), &mut rand::thread_rng());
    let route = NewRoute::resolve(input, uid, now.naive_utc());

    tracing::info!(uid = %route.uid, name = ?route.name, "Creating route");

    let mut conn = db.acquire().await.map_err(|e| AppError::query(FAILURE, e))?;

    let created = sqlx::query_as::<_, Route>(
        r#"
        INSERT INTO route (
            uid, created_by, created_time, modified_by, modified_time,
            server_add_time, server_modified_time, company_uid, code, name,
            role_uid, org_uid, job_position_uid, is_active, status,
            valid_from, valid_upto, visit_duration, travel_time, visit_time,
            end_time, auto_freeze_run_time, is_customer_with_time, wh_org_uid, vehicle_uid,
            location_uid, print_standing, print_topup, print_order_summary, print_forward,
            auto_freeze_jp, add_to_run, ss, total_customers
        )
        VALUES (
            $1, $2, $3, $2, $3,
            $3, $3, $4, $5, $6,
            $7, $4, $8, true, $9,
            $10, $11, $12, $13, $14::time,
            $15::time, $16::time, $17, $18, $19,
            $20, $21, $22, $23, $24,
            $25, $26, $27, $28
        )
        RETURNING
            uid,
            code,
            name,
            company_uid,
            role_uid,
            org_uid,
            job_position_uid,
            wh_org_uid,
            vehicle_uid,
            location_uid,
            is_active,
            status,
            valid_from,
            valid_upto,
            visit_duration::int4 AS visit_duration,
            travel_time::int4 AS travel_time,
            visit_time::text AS visit_time,
            end_time::text AS end_time,
            auto_freeze_run_time::text AS auto_freeze_run_time,
            is_customer_with_time,
            print_standing,
            print_topup,
            print_order_summary,
            print_forward,
            auto_freeze_jp,
            add_to_run,
            ss::int4 AS ss,
            total_customers::int4 AS total_customers,
            created_by,
            created_time::timestamp AS created_time
        "#,
    )
    .bind(&route.uid)
    .bind(SYSTEM_USER)
    .bind(route.stamped_at)
    .bind(&route.org_uid)
    .bind(&route.code)
    .bind(&route.name)
    .bind(&route.role_uid)
    .bind(&route.job_position_uid)
    .bind(&route.status)
    .bind(route.valid_from)
    .bind(route.valid_upto)
    .bind(route.visit_duration)
    .bind(route.travel_time)
    .bind(&route.visit_time)
    .bind(&route.end_time)
    .bind(&route.auto_freeze_run_time)
    .bind(route.is_customer_with_time)
    .bind(&route.wh_org_uid)
    .bind(&route.vehicle_uid)
    .bind(&route.location_uid)
    .bind(route.print_standing)
    .bind(route.print_topup)
    .bind(route.print_order_summary)
    .bind(route.print_forward)
    .bind(route.auto_freeze_jp)
    .bind(route.add_to_run)
    .bind(route.ss)
    .bind(route.total_customers)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::query(FAILURE, e))?;

    counter!("routes_created_total").increment(1);
    tracing::info!(uid = %created.uid, "Route created");

    Ok(created)
}

/// Summary counts for the dashboard plus the most recent active routes.
pub async fn dashboard(db: &PgPool) -> AppResult<RouteDashboard> {
    const FAILURE: &str = "Failed to fetch dashboard";

    let (total_routes, active_routes, organizations) = sqlx::query_as::<_, (i64, i64, i64)>(
        r#"
        SELECT
            COUNT(*)::int8,
            COUNT(*) FILTER (WHERE is_active = true)::int8,
            COUNT(DISTINCT org_uid) FILTER (WHERE is_active = true)::int8
        FROM route
        "#,
    )
    .fetch_one(db)
    .await
    .map_err(|e| AppError::query(FAILURE, e))?;

    let recent_routes: Vec<RouteSummary> = list(db, &EntityQuery::RECENT_ROUTES, None).await?;

    Ok(RouteDashboard {
        total_routes,
        active_routes,
        inactive_routes: total_routes - active_routes,
        organizations,
        recent_routes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn empty_body_gets_every_default() {
        let route = NewRoute::resolve(&CreateRouteInput::default(), "RT1".into(), noon(2024, 3, 1));

        assert_eq!(route.role_uid, "Admin");
        assert_eq!(route.job_position_uid, "SUPERVISOR");
        assert_eq!(route.org_uid, "EPIC01");
        assert_eq!(route.status, "Active");
        assert_eq!(route.visit_duration, 30);
        assert_eq!(route.travel_time, 15);
        assert!(!route.is_customer_with_time);
        assert_eq!(route.total_customers, 0);
        assert_eq!(route.ss, 0);
    }

    #[test]
    fn empty_validity_window_spans_one_year_from_today() {
        let input = CreateRouteInput {
            valid_from: Some(String::new()),
            valid_upto: Some(String::new()),
            ..Default::default()
        };
        let route = NewRoute::resolve(&input, "RT1".into(), noon(2024, 3, 1));

        assert_eq!(route.valid_from, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(route.valid_upto, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn zero_durations_and_blank_strings_count_as_missing() {
        let input = CreateRouteInput {
            role_uid: Some("  ".into()),
            visit_duration: Some(0),
            travel_time: Some(0),
            visit_time: Some(String::new()),
            ..Default::default()
        };
        let route = NewRoute::resolve(&input, "RT1".into(), noon(2024, 3, 1));

        assert_eq!(route.role_uid, "Admin");
        assert_eq!(route.visit_duration, 30);
        assert_eq!(route.travel_time, 15);
        assert_eq!(route.visit_time, None);
    }

    #[test]
    fn provided_values_are_kept_without_window_ordering_check() {
        let input = CreateRouteInput {
            name: Some("Harbour Loop".into()),
            role_uid: Some("DRIVER".into()),
            org_uid: Some("ORG7".into()),
            valid_from: Some("2024-12-31".into()),
            valid_upto: Some("2024-01-01".into()),
            visit_duration: Some(45),
            total_customers: Some(3),
            print_topup: Some(true),
            ..Default::default()
        };
        let route = NewRoute::resolve(&input, "RT1".into(), noon(2024, 3, 1));

        assert_eq!(route.name.as_deref(), Some("Harbour Loop"));
        assert_eq!(route.role_uid, "DRIVER");
        assert_eq!(route.org_uid, "ORG7");
        assert_eq!(route.valid_from, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(route.valid_upto, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(route.visit_duration, 45);
        assert_eq!(route.total_customers, 3);
        assert!(route.print_topup);
    }

    #[test]
    fn wizard_draft_body_deserializes_and_ignores_customers() {
        let body = serde_json::json!({
            "name": "North",
            "code": "RT123456ABC",
            "valid_from": "",
            "customers": [{ "id": "store_S1_1", "name": "Corner Shop" }],
            "visit_duration": 30,
            "is_customer_with_time": false
        });
        let input: CreateRouteInput = serde_json::from_value(body).unwrap();

        assert_eq!(input.name.as_deref(), Some("North"));
        assert_eq!(input.valid_from.as_deref(), Some(""));
        assert_eq!(input.visit_duration, Some(30));
    }
}
