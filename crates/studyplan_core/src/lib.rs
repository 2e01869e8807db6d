//! Core domain logic for the study plan tracker.
//! This crate is the single source of truth for plan invariants, storage
//! layout and flowchart generation.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::flowchart::{Flowchart, FlowchartNode, NodeKind};
pub use model::plan::{
    create_plan, PlanId, PlanInput, PlanValidationError, StudyDuration, StudyPlan,
};
pub use repo::kv_storage::{
    KeyValueStorage, MemoryStorage, SqliteStorage, StorageError, StorageResult,
};
pub use repo::plan_store::{PlanStore, PLANS_KEY};
pub use service::plan_service::{PlanService, PlanServiceError, SubmittedPlan};
pub use view::derived::{
    duration_label, format_duration, remaining_days, summarize, PlanSummary, NOT_SPECIFIED,
};
pub use view::flowchart::build_flowchart;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
