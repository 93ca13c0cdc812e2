use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Row of the routes table as shown on the routes page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RouteSummary {
    pub id: i64,
    pub route: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    pub employee_id: Option<String>,
    pub organization: Option<String>,
    pub assignment: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub valid_upto: Option<NaiveDate>,
}

/// A freshly inserted route row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Route {
    pub uid: String,
    pub code: Option<String>,
    pub name: Option<String>,
    pub company_uid: Option<String>,
    pub role_uid: Option<String>,
    pub org_uid: Option<String>,
    pub job_position_uid: Option<String>,
    pub wh_org_uid: Option<String>,
    pub vehicle_uid: Option<String>,
    pub location_uid: Option<String>,
    pub is_active: bool,
    pub status: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub valid_upto: Option<NaiveDate>,
    pub visit_duration: Option<i32>,
    pub travel_time: Option<i32>,
    pub visit_time: Option<String>,
    pub end_time: Option<String>,
    pub auto_freeze_run_time: Option<String>,
    pub is_customer_with_time: Option<bool>,
    pub print_standing: Option<bool>,
    pub print_topup: Option<bool>,
    pub print_order_summary: Option<bool>,
    pub print_forward: Option<bool>,
    pub auto_freeze_jp: Option<bool>,
    pub add_to_run: Option<bool>,
    pub ss: Option<i32>,
    pub total_customers: Option<i32>,
    pub created_by: Option<String>,
    pub created_time: Option<NaiveDateTime>,
}

/// Body of `POST /api/routes`.
///
/// Every field is optional; empty strings and zero durations count as
/// missing and are replaced by the insert defaults. Unknown fields (the
/// wizard sends its whole draft, customers included) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateRouteInput {
    pub name: Option<String>,
    pub code: Option<String>,
    pub role_uid: Option<String>,
    pub job_position_uid: Option<String>,
    pub org_uid: Option<String>,
    pub principal_uid: Option<String>,
    pub assignment_role_uid: Option<String>,
    pub primary_employee_uid: Option<String>,
    pub warehouse_uid: Option<String>,
    pub vehicle_type: Option<String>,
    pub status: Option<String>,
    pub valid_from: Option<String>,
    pub valid_upto: Option<String>,
    pub visit_duration: Option<i32>,
    pub travel_time: Option<i32>,
    pub visit_time: Option<String>,
    pub end_time: Option<String>,
    pub auto_freeze_run_time: Option<String>,
    pub is_customer_with_time: Option<bool>,
    pub wh_org_uid: Option<String>,
    pub vehicle_uid: Option<String>,
    pub location_uid: Option<String>,
    pub print_standing: Option<bool>,
    pub print_topup: Option<bool>,
    pub print_order_summary: Option<bool>,
    pub auto_freeze_jp: Option<bool>,
    pub add_to_run: Option<bool>,
    pub ss: Option<i32>,
    pub total_customers: Option<i32>,
    pub print_forward: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RouteDashboard {
    pub total_routes: i64,
    pub active_routes: i64,
    pub inactive_routes: i64,
    pub organizations: i64,
    pub recent_routes: Vec<RouteSummary>,
}
