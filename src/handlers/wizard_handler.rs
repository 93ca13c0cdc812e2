use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::Route,
    wizard::{
        CustomerField, Day, Frequency, MonthDay, RouteDraftPatch, RouteWizard, SlotSelector, Week,
        WizardSnapshot,
    },
    AppError, AppResult, AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct WizardView {
    pub session_id: Uuid,
    #[schema(value_type = Object)]
    pub wizard: WizardSnapshot,
}

impl WizardView {
    fn of(session_id: Uuid, wizard: &RouteWizard) -> Json<Self> {
        Json(Self {
            session_id,
            wizard: wizard.snapshot(),
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct StoreSearchInput {
    pub search: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SelectorInput {
    pub frequency: Option<Frequency>,
    pub week: Option<Week>,
    pub day: Option<Day>,
    #[schema(value_type = Option<String>, example = "15")]
    pub month_day: Option<MonthDay>,
}

impl SelectorInput {
    /// `current` with every provided picker replaced.
    fn over(&self, current: SlotSelector) -> SlotSelector {
        SlotSelector {
            week: self.week.unwrap_or(current.week),
            day: self.day.unwrap_or(current.day),
            month_day: self.month_day.unwrap_or(current.month_day),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct AssignInput {
    /// Customers to schedule; the pending set when omitted
    pub customer_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerUpdateInput {
    pub field: CustomerField,
    pub value: String,
}

/// POST /api/wizard
#[utoipa::path(
    post,
    path = "/api/wizard",
    responses(
        (status = 201, description = "Wizard opened at Basic Information", body = WizardView)
    ),
    tag = "wizard"
)]
pub async fn open_wizard(State(state): State<Arc<AppState>>) -> (StatusCode, Json<WizardView>) {
    let (id, wizard) = state.wizards.open().await;
    let wizard = wizard.lock().await;
    (StatusCode::CREATED, WizardView::of(id, &wizard))
}

/// GET /api/wizard/{id}
#[utoipa::path(
    get,
    path = "/api/wizard/{id}",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    responses(
        (status = 200, description = "Current wizard state", body = WizardView),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "wizard"
)]
pub async fn get_wizard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let wizard = wizard.lock().await;
    Ok(WizardView::of(id, &wizard))
}

/// DELETE /api/wizard/{id}
#[utoipa::path(
    delete,
    path = "/api/wizard/{id}",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    responses(
        (status = 204, description = "Wizard closed and staged customers discarded"),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "wizard"
)]
pub async fn close_wizard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.wizards.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/wizard/{id}/next
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/next",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    responses(
        (status = 200, description = "Moved forward one stage (stays at Review)", body = WizardView),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "wizard"
)]
pub async fn next_stage(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.next().await;
    Ok(WizardView::of(id, &wizard))
}

/// POST /api/wizard/{id}/previous
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/previous",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    responses(
        (status = 200, description = "Moved back one stage (stays at Basic Information)", body = WizardView),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "wizard"
)]
pub async fn previous_stage(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.previous().await;
    Ok(WizardView::of(id, &wizard))
}

/// PATCH /api/wizard/{id}/draft
#[utoipa::path(
    patch,
    path = "/api/wizard/{id}/draft",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    request_body = RouteDraftPatch,
    responses(
        (status = 200, description = "Draft updated", body = WizardView),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "wizard"
)]
pub async fn update_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<RouteDraftPatch>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.update_draft(patch);
    Ok(WizardView::of(id, &wizard))
}

/// POST /api/wizard/{id}/code
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/code",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    responses(
        (status = 200, description = "Route code generated from the current role", body = WizardView),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "wizard"
)]
pub async fn generate_code(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.generate_code();
    Ok(WizardView::of(id, &wizard))
}

/// POST /api/wizard/{id}/stores/search
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/stores/search",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    request_body = StoreSearchInput,
    responses(
        (status = 200, description = "Candidate stores refreshed", body = WizardView),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "wizard"
)]
pub async fn search_stores(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<StoreSearchInput>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.search_stores(&input.search).await;
    Ok(WizardView::of(id, &wizard))
}

/// POST /api/wizard/{id}/stores/{uid}/toggle
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/stores/{uid}/toggle",
    params(
        ("id" = Uuid, Path, description = "Wizard session id"),
        ("uid" = String, Path, description = "Store uid")
    ),
    responses(
        (status = 200, description = "Store selection toggled", body = WizardView),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "wizard"
)]
pub async fn toggle_store(
    State(state): State<Arc<AppState>>,
    Path((id, uid)): Path<(Uuid, String)>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.toggle_store_selection(&uid);
    Ok(WizardView::of(id, &wizard))
}

/// POST /api/wizard/{id}/stores/select-all
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/stores/select-all",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    responses(
        (status = 200, description = "All candidates selected, or all cleared", body = WizardView),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "wizard"
)]
pub async fn select_all_stores(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.select_all();
    Ok(WizardView::of(id, &wizard))
}

/// POST /api/wizard/{id}/customers/commit
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/customers/commit",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    responses(
        (status = 200, description = "Selected stores staged as customers", body = WizardView),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "wizard"
)]
pub async fn commit_customers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.commit_selected_stores_as_customers()?;
    Ok(WizardView::of(id, &wizard))
}

/// PATCH /api/wizard/{id}/customers/{cid}
#[utoipa::path(
    patch,
    path = "/api/wizard/{id}/customers/{cid}",
    params(
        ("id" = Uuid, Path, description = "Wizard session id"),
        ("cid" = String, Path, description = "Customer id")
    ),
    request_body = CustomerUpdateInput,
    responses(
        (status = 200, description = "Customer field updated", body = WizardView),
        (status = 404, description = "Unknown session or customer")
    ),
    tag = "wizard"
)]
pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path((id, cid)): Path<(Uuid, String)>,
    Json(input): Json<CustomerUpdateInput>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    if !wizard.update_customer(&cid, input.field, input.value) {
        return Err(AppError::NotFound(format!("Customer {} not found", cid)));
    }
    Ok(WizardView::of(id, &wizard))
}

/// DELETE /api/wizard/{id}/customers/{cid}
#[utoipa::path(
    delete,
    path = "/api/wizard/{id}/customers/{cid}",
    params(
        ("id" = Uuid, Path, description = "Wizard session id"),
        ("cid" = String, Path, description = "Customer id")
    ),
    responses(
        (status = 200, description = "Customer removed from the draft", body = WizardView),
        (status = 404, description = "Unknown session or customer")
    ),
    tag = "wizard"
)]
pub async fn remove_customer(
    State(state): State<Arc<AppState>>,
    Path((id, cid)): Path<(Uuid, String)>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    if !wizard.remove_customer(&cid) {
        return Err(AppError::NotFound(format!("Customer {} not found", cid)));
    }
    Ok(WizardView::of(id, &wizard))
}

/// PUT /api/wizard/{id}/schedule/selector
#[utoipa::path(
    put,
    path = "/api/wizard/{id}/schedule/selector",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    request_body = SelectorInput,
    responses(
        (status = 200, description = "Pickers updated; pending customers auto-assigned on slot change", body = WizardView),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "wizard"
)]
pub async fn update_selector(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<SelectorInput>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;

    // Frequency first so slot changes assign at the new frequency
    if let Some(frequency) = input.frequency {
        wizard.set_frequency(frequency);
    }
    let current = *wizard.selector();
    wizard.update_selector(input.over(current));

    Ok(WizardView::of(id, &wizard))
}

/// POST /api/wizard/{id}/schedule/customers/{cid}/toggle
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/schedule/customers/{cid}/toggle",
    params(
        ("id" = Uuid, Path, description = "Wizard session id"),
        ("cid" = String, Path, description = "Customer id")
    ),
    responses(
        (status = 200, description = "Customer added to or removed from the pending set", body = WizardView),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "wizard"
)]
pub async fn toggle_schedule_customer(
    State(state): State<Arc<AppState>>,
    Path((id, cid)): Path<(Uuid, String)>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.toggle_customer_for_schedule(&cid);
    Ok(WizardView::of(id, &wizard))
}

/// POST /api/wizard/{id}/schedule/assign
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/schedule/assign",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    request_body = AssignInput,
    responses(
        (status = 200, description = "Customers assigned at the current frequency and slot", body = WizardView),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "wizard"
)]
pub async fn assign_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<AssignInput>,
) -> AppResult<Json<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;

    let added = match input.customer_ids {
        Some(ids) => {
            let frequency = wizard.frequency();
            let selector = *wizard.selector();
            wizard.assign_to_schedule(&ids, frequency, &selector)
        }
        None => wizard.schedule_pending(),
    };
    tracing::debug!(session_id = %id, added, "Scheduled customers");

    Ok(WizardView::of(id, &wizard))
}

/// POST /api/wizard/{id}/submit
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/submit",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    responses(
        (status = 201, description = "Route created; the wizard starts over", body = Route),
        (status = 404, description = "Unknown or expired session"),
        (status = 409, description = "Wizard is not at the Review stage"),
        (status = 500, description = "Failed to create route; the wizard is unchanged")
    ),
    tag = "wizard"
)]
pub async fn submit_wizard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<Route>)> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;

    let route = wizard.submit().await?;
    counter!("wizard_routes_submitted_total").increment(1);
    tracing::info!(session_id = %id, uid = %route.uid, "Wizard route submitted");

    Ok((StatusCode::CREATED, Json(route)))
}
