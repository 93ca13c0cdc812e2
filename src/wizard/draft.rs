use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::schedule::Frequency;
use crate::models::{CreateRouteInput, Store};

/// A store captured as a route customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSelection {
    pub id: String,
    pub name: String,
    pub address: String,
    pub contact: String,
    pub visit_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
}

impl CustomerSelection {
    /// Capture `store` at `captured_at` (epoch millis).
    ///
    /// The id embeds the capture time, so picking the same store twice
    /// yields two customers.
    pub fn from_store(store: &Store, frequency: Frequency, captured_at: i64) -> Self {
        let address = store
            .alias_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(store.legal_name.as_deref())
            .unwrap_or_default()
            .to_string();

        Self {
            id: format!("store_{}_{}", store.uid, captured_at),
            name: store.name.clone().unwrap_or_default(),
            address,
            contact: store.store_type.clone().unwrap_or_default(),
            visit_time: String::new(),
            frequency: Some(frequency),
        }
    }

    /// Store uid segment of the id, or the whole id when it has none.
    pub fn store_code(&self) -> &str {
        self.id
            .split('_')
            .nth(1)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CustomerField {
    Name,
    Address,
    Contact,
    VisitTime,
}

/// The route under construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDraft {
    pub name: String,
    pub code: String,
    pub role_uid: String,
    pub job_position_uid: String,
    pub org_uid: String,
    pub principal_uid: String,
    pub status: String,
    pub valid_from: String,
    pub valid_upto: String,
    pub assignment_role_uid: String,
    pub primary_employee_uid: String,
    pub warehouse_uid: String,
    pub vehicle_type: String,
    pub wh_org_uid: String,
    pub vehicle_uid: String,
    pub location_uid: String,
    pub print_standing: bool,
    pub print_topup: bool,
    pub print_order_summary: bool,
    pub auto_freeze_jp: bool,
    pub add_to_run: bool,
    pub print_forward: bool,
    pub ss: i32,
    pub total_customers: i32,
    pub customers: Vec<CustomerSelection>,
    pub visit_duration: i32,
    pub travel_time: i32,
    pub visit_time: String,
    pub end_time: String,
    pub auto_freeze_run_time: String,
    pub is_customer_with_time: bool,
}

impl Default for RouteDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            code: String::new(),
            role_uid: String::new(),
            job_position_uid: String::new(),
            org_uid: "EPIC01".to_string(),
            principal_uid: String::new(),
            status: "Active".to_string(),
            valid_from: String::new(),
            valid_upto: String::new(),
            assignment_role_uid: String::new(),
            primary_employee_uid: String::new(),
            warehouse_uid: String::new(),
            vehicle_type: String::new(),
            wh_org_uid: String::new(),
            vehicle_uid: String::new(),
            location_uid: String::new(),
            print_standing: false,
            print_topup: false,
            print_order_summary: false,
            auto_freeze_jp: false,
            add_to_run: false,
            print_forward: false,
            ss: 0,
            total_customers: 0,
            customers: Vec::new(),
            visit_duration: 30,
            travel_time: 15,
            visit_time: String::new(),
            end_time: String::new(),
            auto_freeze_run_time: String::new(),
            is_customer_with_time: false,
        }
    }
}

/// Partial update of the draft's form fields. Customers are not patchable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RouteDraftPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub role_uid: Option<String>,
    pub job_position_uid: Option<String>,
    pub org_uid: Option<String>,
    pub principal_uid: Option<String>,
    pub status: Option<String>,
    pub valid_from: Option<String>,
    pub valid_upto: Option<String>,
    pub assignment_role_uid: Option<String>,
    pub primary_employee_uid: Option<String>,
    pub warehouse_uid: Option<String>,
    pub vehicle_type: Option<String>,
    pub wh_org_uid: Option<String>,
    pub vehicle_uid: Option<String>,
    pub location_uid: Option<String>,
    pub print_standing: Option<bool>,
    pub print_topup: Option<bool>,
    pub print_order_summary: Option<bool>,
    pub auto_freeze_jp: Option<bool>,
    pub add_to_run: Option<bool>,
    pub print_forward: Option<bool>,
    pub ss: Option<i32>,
    pub total_customers: Option<i32>,
    pub visit_duration: Option<i32>,
    pub travel_time: Option<i32>,
    pub visit_time: Option<String>,
    pub end_time: Option<String>,
    pub auto_freeze_run_time: Option<String>,
    pub is_customer_with_time: Option<bool>,
}

macro_rules! apply_fields {
    ($draft:ident, $patch:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $draft.$field = value;
            }
        )+
    };
}

impl RouteDraft {
    pub fn apply(&mut self, patch: RouteDraftPatch) {
        // Picking the assignment role also sets the route role, unless the
        // patch names a role explicitly.
        let mirrored_role = match (&patch.role_uid, &patch.assignment_role_uid) {
            (None, Some(role)) => Some(role.clone()),
            _ => None,
        };

        let draft = self;
        apply_fields!(
            draft, patch,
            name, code, role_uid, job_position_uid, org_uid, principal_uid, status,
            valid_from, valid_upto, assignment_role_uid, primary_employee_uid,
            warehouse_uid, vehicle_type, wh_org_uid, vehicle_uid, location_uid,
            print_standing, print_topup, print_order_summary, auto_freeze_jp,
            add_to_run, print_forward, ss, total_customers, visit_duration,
            travel_time, visit_time, end_time, auto_freeze_run_time,
            is_customer_with_time,
        );

        if let Some(role) = mirrored_role {
            draft.role_uid = role;
        }
    }

    /// Set one text field of the customer with `id`. Returns false when no
    /// customer has that id.
    pub fn update_customer(&mut self, id: &str, field: CustomerField, value: String) -> bool {
        let Some(customer) = self.customers.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        match field {
            CustomerField::Name => customer.name = value,
            CustomerField::Address => customer.address = value,
            CustomerField::Contact => customer.contact = value,
            CustomerField::VisitTime => customer.visit_time = value,
        }
        true
    }

    pub fn remove_customer(&mut self, id: &str) -> bool {
        let before = self.customers.len();
        self.customers.retain(|c| c.id != id);
        self.customers.len() != before
    }
}

impl From<&RouteDraft> for CreateRouteInput {
    fn from(draft: &RouteDraft) -> Self {
        let text = |value: &String| Some(value.clone());

        CreateRouteInput {
            name: text(&draft.name),
            code: text(&draft.code),
            role_uid: text(&draft.role_uid),
            job_position_uid: text(&draft.job_position_uid),
            org_uid: text(&draft.org_uid),
            principal_uid: text(&draft.principal_uid),
            assignment_role_uid: text(&draft.assignment_role_uid),
            primary_employee_uid: text(&draft.primary_employee_uid),
            warehouse_uid: text(&draft.warehouse_uid),
            vehicle_type: text(&draft.vehicle_type),
            status: text(&draft.status),
            valid_from: text(&draft.valid_from),
            valid_upto: text(&draft.valid_upto),
            visit_duration: Some(draft.visit_duration),
            travel_time: Some(draft.travel_time),
            visit_time: text(&draft.visit_time),
            end_time: text(&draft.end_time),
            auto_freeze_run_time: text(&draft.auto_freeze_run_time),
            is_customer_with_time: Some(draft.is_customer_with_time),
            wh_org_uid: text(&draft.wh_org_uid),
            vehicle_uid: text(&draft.vehicle_uid),
            location_uid: text(&draft.location_uid),
            print_standing: Some(draft.print_standing),
            print_topup: Some(draft.print_topup),
            print_order_summary: Some(draft.print_order_summary),
            auto_freeze_jp: Some(draft.auto_freeze_jp),
            add_to_run: Some(draft.add_to_run),
            ss: Some(draft.ss),
            total_customers: Some(draft.total_customers),
            print_forward: Some(draft.print_forward),
        }
    }
}
