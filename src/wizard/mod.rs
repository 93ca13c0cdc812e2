//! Route-creation wizard.
//!
//! A [`RouteWizard`] walks BasicInfo → Customers → Schedule → Review while
//! building a [`RouteDraft`]. Store picks made on the Customers stage go to
//! the wizard's own [`Staging`] slot. Entering Schedule copies that slot back
//! into the draft, and submitting turns the draft into one route insert.

pub mod backend;
pub mod draft;
pub mod schedule;
pub mod session;
pub mod stage;
pub mod staging;

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    codes,
    models::{CreateRouteInput, ReferenceLists, Route, Store},
    AppError,
};

pub use backend::RouteBackend;
pub use draft::{CustomerField, CustomerSelection, RouteDraft, RouteDraftPatch};
pub use schedule::{Day, Frequency, MonthDay, ScheduledAssignment, Slot, SlotSelector, Week};
pub use session::WizardSessions;
pub use stage::{EntryEffect, Stage, Transition};
pub use staging::{MemoryStaging, Staging, StagingStore, CUSTOMERS_KEY};

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Routes can only be submitted from the Review stage (currently at {0})")]
    NotAtReview(Stage),

    #[error("Failed to stage customers: {0}")]
    Staging(#[from] serde_json::Error),

    #[error(transparent)]
    Backend(#[from] AppError),
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::NotAtReview(_) => AppError::Conflict(err.to_string()),
            WizardError::Staging(_) => AppError::Internal(err.to_string()),
            WizardError::Backend(inner) => inner,
        }
    }
}

pub struct RouteWizard<S = MemoryStaging> {
    backend: Arc<dyn RouteBackend>,
    staging: Staging<S>,
    stage: Stage,
    draft: RouteDraft,
    references: ReferenceLists,
    search: String,
    candidates: Vec<Store>,
    selected_stores: Vec<String>,
    frequency: Frequency,
    selector: SlotSelector,
    pending: Vec<String>,
    assignments: Vec<ScheduledAssignment>,
    last_capture: i64,
}

impl<S: StagingStore> RouteWizard<S> {
    /// A fresh wizard at BasicInfo with an empty draft.
    pub fn open(backend: Arc<dyn RouteBackend>, staging: S) -> Self {
        Self {
            backend,
            staging: Staging::new(staging),
            stage: Stage::default(),
            draft: RouteDraft::default(),
            references: ReferenceLists::default(),
            search: String::new(),
            candidates: Vec::new(),
            selected_stores: Vec::new(),
            frequency: Frequency::default(),
            selector: SlotSelector::default(),
            pending: Vec::new(),
            assignments: Vec::new(),
            last_capture: 0,
        }
    }

    pub async fn load_references(&mut self) {
        self.references = self.backend.reference_lists().await;
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn draft(&self) -> &RouteDraft {
        &self.draft
    }

    pub fn candidates(&self) -> &[Store] {
        &self.candidates
    }

    pub fn selected_stores(&self) -> &[String] {
        &self.selected_stores
    }

    pub fn pending_customers(&self) -> &[String] {
        &self.pending
    }

    pub fn assignments(&self) -> &[ScheduledAssignment] {
        &self.assignments
    }

    pub fn staging(&self) -> &Staging<S> {
        &self.staging
    }

    pub fn staging_mut(&mut self) -> &mut Staging<S> {
        &mut self.staging
    }

    pub async fn next(&mut self) -> Stage {
        self.transition(Transition::Next).await
    }

    pub async fn previous(&mut self) -> Stage {
        self.transition(Transition::Previous).await
    }

    async fn transition(&mut self, transition: Transition) -> Stage {
        let target = self.stage.after(transition);
        if target != self.stage {
            tracing::debug!(from = %self.stage, to = %target, "Wizard transition");
            self.stage = target;
            if let Some(effect) = target.on_enter() {
                self.run_entry_effect(effect).await;
            }
        }
        self.stage
    }

    async fn run_entry_effect(&mut self, effect: EntryEffect) {
        match effect {
            EntryEffect::FetchCandidates => self.refresh_candidates().await,
            EntryEffect::ResyncCustomers => {
                self.draft.customers = self.staging.customers();
                tracing::debug!(count = self.draft.customers.len(), "Customers loaded from staging");
            }
        }
    }

    async fn refresh_candidates(&mut self) {
        let search = Some(self.search.as_str()).filter(|s| !s.is_empty());
        match self.backend.list_stores(search).await {
            Ok(stores) => self.candidates = stores,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load candidate stores");
                self.candidates.clear();
            }
        }
    }

    pub fn update_draft(&mut self, patch: RouteDraftPatch) {
        self.draft.apply(patch);
    }

    /// Generate a route code from the current role and store it in the draft.
    pub fn generate_code(&mut self) -> &str {
        let millis = Utc::now().timestamp_millis();
        self.draft.code = codes::route_code(&self.draft.role_uid, millis, &mut rand::thread_rng());
        &self.draft.code
    }

    pub async fn search_stores(&mut self, term: &str) {
        self.search = term.to_string();
        self.refresh_candidates().await;
    }

    pub fn toggle_store_selection(&mut self, store_uid: &str) {
        toggle(&mut self.selected_stores, store_uid);
    }

    /// Select every candidate, or clear the selection when every candidate
    /// is already selected.
    pub fn select_all(&mut self) {
        let all_selected = !self.candidates.is_empty()
            && self
                .candidates
                .iter()
                .all(|c| self.selected_stores.contains(&c.uid));

        if all_selected {
            self.selected_stores.clear();
        } else {
            self.selected_stores = self.candidates.iter().map(|s| s.uid.clone()).collect();
        }
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn selector(&self) -> &SlotSelector {
        &self.selector
    }

    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency;
    }

    /// Stage every selected candidate as a new customer, then reset the
    /// picker. Returns how many customers were staged.
    pub fn commit_selected_stores_as_customers(&mut self) -> Result<usize, WizardError> {
        if self.selected_stores.is_empty() {
            return Ok(0);
        }

        let captured_at = self.next_capture_stamp();
        let new: Vec<CustomerSelection> = self
            .candidates
            .iter()
            .filter(|store| self.selected_stores.contains(&store.uid))
            .map(|store| CustomerSelection::from_store(store, self.frequency, captured_at))
            .collect();

        if new.is_empty() {
            return Ok(0);
        }

        let total = self.staging.append_customers(&new)?;
        tracing::info!(added = new.len(), total, "Staged customers");

        self.selected_stores.clear();
        self.search.clear();
        self.candidates.clear();

        Ok(new.len())
    }

    // Strictly increasing so repeated captures never share an id.
    fn next_capture_stamp(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_capture = now.max(self.last_capture + 1);
        self.last_capture
    }

    pub fn toggle_customer_for_schedule(&mut self, customer_id: &str) {
        toggle(&mut self.pending, customer_id);
    }

    pub fn select_week(&mut self, week: Week) {
        self.update_selector(SlotSelector { week, ..self.selector });
    }

    pub fn select_day(&mut self, day: Day) {
        self.update_selector(SlotSelector { day, ..self.selector });
    }

    pub fn select_month_day(&mut self, month_day: MonthDay) {
        self.update_selector(SlotSelector { month_day, ..self.selector });
    }

    /// Move the pickers to `selector` in one step. Pending customers are
    /// assigned once, at the final slot, and only if something changed.
    pub fn update_selector(&mut self, selector: SlotSelector) {
        if self.selector != selector {
            self.selector = selector;
            self.auto_assign_pending();
        }
    }

    // A slot change while customers are pending adds them to the new slot;
    // their earlier assignments stay where they are.
    fn auto_assign_pending(&mut self) {
        if self.pending.is_empty() || self.frequency == Frequency::Daily {
            return;
        }
        let pending = self.pending.clone();
        let selector = self.selector;
        self.assign_to_schedule(&pending, self.frequency, &selector);
    }

    /// Schedule the pending customers at the current frequency and slot.
    pub fn schedule_pending(&mut self) -> usize {
        let pending = self.pending.clone();
        let selector = self.selector;
        self.assign_to_schedule(&pending, self.frequency, &selector)
    }

    /// Add an assignment per known customer id, skipping duplicates.
    /// Returns how many were added.
    pub fn assign_to_schedule(
        &mut self,
        customer_ids: &[String],
        frequency: Frequency,
        selector: &SlotSelector,
    ) -> usize {
        let mut added = 0;
        for id in customer_ids {
            let Some(customer) = self.draft.customers.iter().find(|c| &c.id == id) else {
                continue;
            };
            let assignment = ScheduledAssignment::new(customer, frequency, selector);
            if !self.assignments.iter().any(|existing| existing.same_slot(&assignment)) {
                self.assignments.push(assignment);
                added += 1;
            }
        }
        added
    }

    /// Assignments listed under the current frequency and slot pickers.
    pub fn assignments_for_current_selection(&self) -> Vec<&ScheduledAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.matches_selection(self.frequency, &self.selector))
            .collect()
    }

    pub fn remove_customer(&mut self, customer_id: &str) -> bool {
        self.draft.remove_customer(customer_id)
    }

    pub fn update_customer(&mut self, customer_id: &str, field: CustomerField, value: String) -> bool {
        self.draft.update_customer(customer_id, field, value)
    }

    /// Insert the draft as a route. On success staging is cleared and the
    /// wizard starts over; on failure nothing changes.
    pub async fn submit(&mut self) -> Result<Route, WizardError> {
        if self.stage != Stage::Review {
            return Err(WizardError::NotAtReview(self.stage));
        }

        let input = CreateRouteInput::from(&self.draft);
        let route = self.backend.create_route(&input).await?;

        self.staging.clear();
        self.reset();
        Ok(route)
    }

    /// Abandon the draft: staging is cleared and the wizard starts over.
    pub fn close(&mut self) {
        self.staging.clear();
        self.reset();
    }

    /// Hand back the staging store, e.g. to open a new wizard on it.
    pub fn into_staging(self) -> S {
        self.staging.into_inner()
    }

    fn reset(&mut self) {
        self.stage = Stage::default();
        self.draft = RouteDraft::default();
        self.search.clear();
        self.candidates.clear();
        self.selected_stores.clear();
        self.frequency = Frequency::default();
        self.selector = SlotSelector::default();
        self.pending.clear();
        self.assignments.clear();
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            stage: self.stage,
            step: self.stage.number(),
            step_title: self.stage.title(),
            draft: self.draft.clone(),
            search: self.search.clone(),
            candidates: self.candidates.clone(),
            selected_stores: self.selected_stores.clone(),
            staged_customers: self.staging.customers().len(),
            frequency: self.frequency,
            selector: self.selector,
            pending_customers: self.pending.clone(),
            assignments: self.assignments.clone(),
            current_assignments: self
                .assignments_for_current_selection()
                .into_iter()
                .cloned()
                .collect(),
            references: self.references.clone(),
        }
    }
}

fn toggle(set: &mut Vec<String>, value: &str) {
    if let Some(pos) = set.iter().position(|v| v == value) {
        set.remove(pos);
    } else {
        set.push(value.to_string());
    }
}

/// Serializable view of a wizard.
#[derive(Debug, Clone, Serialize)]
pub struct WizardSnapshot {
    pub stage: Stage,
    pub step: u8,
    pub step_title: &'static str,
    pub draft: RouteDraft,
    pub search: String,
    pub candidates: Vec<Store>,
    pub selected_stores: Vec<String>,
    pub staged_customers: usize,
    pub frequency: Frequency,
    pub selector: SlotSelector,
    pub pending_customers: Vec<String>,
    pub assignments: Vec<ScheduledAssignment>,
    pub current_assignments: Vec<ScheduledAssignment>,
    pub references: ReferenceLists,
}
