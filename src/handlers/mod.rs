pub mod health;
pub mod metrics;
pub mod references_handler;
pub mod routes_handler;
pub mod wizard_handler;

pub use health::health_check;
pub use self::metrics::{detached_metrics_state, metrics_handler, setup_metrics_recorder, MetricsState};
