//! Plan use-case service.
//!
//! # Responsibility
//! - Provide the command entry points a presentation layer calls: submit,
//!   list, delete and view.
//! - Keep storage, derived values and flowchart building behind one facade.
//!
//! # Invariants
//! - A submission that fails validation never touches the store.
//! - Derived values are computed from `clock` on every call.

use crate::clock::Clock;
use crate::model::flowchart::Flowchart;
use crate::model::plan::{create_plan, PlanId, PlanInput, PlanValidationError, StudyPlan};
use crate::repo::kv_storage::{KeyValueStorage, StorageError};
use crate::repo::plan_store::PlanStore;
use crate::view::derived::{summarize, PlanSummary};
use crate::view::flowchart::build_flowchart;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for plan use-cases.
#[derive(Debug)]
pub enum PlanServiceError {
    /// Submitted input was rejected; nothing was persisted.
    Validation(PlanValidationError),
    /// Persistence-layer failure.
    Storage(StorageError),
}

impl Display for PlanServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid plan: {err}"),
            Self::Storage(err) => write!(f, "plan not saved: {err}"),
        }
    }
}

impl Error for PlanServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<PlanValidationError> for PlanServiceError {
    fn from(value: PlanValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for PlanServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedPlan {
    pub plan: StudyPlan,
    pub flowchart: Flowchart,
}

/// Plan service facade over a store and a clock.
pub struct PlanService<S: KeyValueStorage, C: Clock> {
    store: PlanStore<S>,
    clock: C,
}

impl<S: KeyValueStorage, C: Clock> PlanService<S, C> {
    pub fn new(store: PlanStore<S>, clock: C) -> Self {
        Self { store, clock }
    }

    /// Validates, persists and renders one submission.
    pub fn submit(&self, input: &PlanInput) -> Result<SubmittedPlan, PlanServiceError> {
        let plan = create_plan(input, &self.clock).map_err(|err| {
            warn!(
                "event=plan_submit module=service status=rejected error={}",
                err
            );
            err
        })?;
        self.store.append(&plan)?;
        let flowchart = build_flowchart(&plan, self.clock.now());
        Ok(SubmittedPlan { plan, flowchart })
    }

    /// Lists stored plans in insertion order.
    pub fn list(&self) -> Vec<StudyPlan> {
        self.store.load_all()
    }

    /// Lists plan summaries newest first.
    pub fn list_summaries(&self) -> Vec<PlanSummary> {
        let now = self.clock.now();
        self.store
            .load_all()
            .iter()
            .rev()
            .map(|plan| summarize(plan, now))
            .collect()
    }

    /// Deletes a plan and returns the remaining collection.
    pub fn delete(&self, id: PlanId) -> Result<Vec<StudyPlan>, PlanServiceError> {
        Ok(self.store.remove(id)?)
    }

    /// Builds the flowchart for a stored plan, if it exists.
    pub fn view(&self, id: PlanId) -> Option<Flowchart> {
        self.store
            .find_by_id(id)
            .map(|plan| build_flowchart(&plan, self.clock.now()))
    }
}
