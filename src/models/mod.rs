pub mod reference;
pub mod route;
pub mod store;

pub use reference::{JobPosition, NamedEntity, ReferenceLists};
pub use route::{CreateRouteInput, Route, RouteDashboard, RouteSummary};
pub use store::Store;
