use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Routeboard API",
        version = "1.0.0",
        description = "Route management backend: reference lists, routes and the route-creation wizard"
    ),
    paths(
        crate::handlers::health::health_check,

        // References
        crate::handlers::references_handler::get_employees,
        crate::handlers::references_handler::get_job_positions,
        crate::handlers::references_handler::get_principals,
        crate::handlers::references_handler::get_roles,
        crate::handlers::references_handler::get_warehouses,
        crate::handlers::references_handler::get_stores,

        // Routes
        crate::handlers::routes_handler::get_routes,
        crate::handlers::routes_handler::create_route,
        crate::handlers::routes_handler::get_dashboard,

        // Wizard
        crate::handlers::wizard_handler::open_wizard,
        crate::handlers::wizard_handler::get_wizard,
        crate::handlers::wizard_handler::close_wizard,
        crate::handlers::wizard_handler::next_stage,
        crate::handlers::wizard_handler::previous_stage,
        crate::handlers::wizard_handler::update_draft,
        crate::handlers::wizard_handler::generate_code,
        crate::handlers::wizard_handler::search_stores,
        crate::handlers::wizard_handler::toggle_store,
        crate::handlers::wizard_handler::select_all_stores,
        crate::handlers::wizard_handler::commit_customers,
        crate::handlers::wizard_handler::update_customer,
        crate::handlers::wizard_handler::remove_customer,
        crate::handlers::wizard_handler::update_selector,
        crate::handlers::wizard_handler::toggle_schedule_customer,
        crate::handlers::wizard_handler::assign_schedule,
        crate::handlers::wizard_handler::submit_wizard,
    ),
    components(
        schemas(
            crate::models::NamedEntity,
            crate::models::JobPosition,
            crate::models::ReferenceLists,
            crate::models::Store,
            crate::models::RouteSummary,
            crate::models::Route,
            crate::models::CreateRouteInput,
            crate::models::RouteDashboard,

            crate::wizard::Stage,
            crate::wizard::Frequency,
            crate::wizard::Week,
            crate::wizard::Day,
            crate::wizard::CustomerField,
            crate::wizard::RouteDraftPatch,
            crate::handlers::wizard_handler::WizardView,
            crate::handlers::wizard_handler::StoreSearchInput,
            crate::handlers::wizard_handler::SelectorInput,
            crate::handlers::wizard_handler::AssignInput,
            crate::handlers::wizard_handler::CustomerUpdateInput,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "references", description = "Employees, roles, principals, warehouses, job positions and stores"),
        (name = "routes", description = "Route listing, creation and dashboard"),
        (name = "wizard", description = "Four-stage route-creation wizard"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_wizard_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/wizard/{id}/submit"));
        assert!(doc.paths.paths.contains_key("/api/stores"));
    }
}
