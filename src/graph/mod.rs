pub mod cycle;
pub mod readiness;
pub mod scheduler;

pub use cycle::detect_cycle;
pub use readiness::{completed_epics, completed_features, epic_ready, feature_ready, newly_available};
pub use scheduler::{next_task, parallel_tasks};
