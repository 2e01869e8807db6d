//! Plan collection store over a key-value medium.
//!
//! # Responsibility
//! - Persist the whole plan collection as one JSON array under `PLANS_KEY`.
//! - Provide load-all / append / remove / find-by-id over that array.
//!
//! # Invariants
//! - Array order is insertion order; `remove` only filters.
//! - Ids are unique within the stored array.
//! - A record that cannot be read as a plan is skipped by reads but written
//!   back untouched, in place, until it is removed by id.
//! - Text that is not a JSON array (or `null`) loads as an empty collection
//!   and is never overwritten by `append`.
//! - Every failure is logged before it is returned or swallowed.

use crate::model::plan::{PlanId, StudyPlan};
use crate::repo::kv_storage::{KeyValueStorage, StorageError, StorageResult};
use log::{debug, error, info, warn};
use serde_json::Value;

/// Well-known storage key holding the plan array.
pub const PLANS_KEY: &str = "studyPlans";

/// One element of the stored array.
#[derive(Debug, Clone, PartialEq)]
enum StoredRecord {
    Plan(StudyPlan),
    /// Kept verbatim so writes never drop data a reader skipped.
    Unreadable { id: Option<PlanId>, raw: Value },
}

impl StoredRecord {
    fn decode(index: usize, raw: Value) -> Self {
        let id = raw.get("id").and_then(Value::as_i64);
        let reason = match serde_json::from_value::<StudyPlan>(raw.clone()) {
            Ok(plan) => match plan.validate() {
                Ok(()) => return Self::Plan(plan),
                Err(err) => err.to_string(),
            },
            Err(err) => err.to_string(),
        };
        warn!(
            "event=plan_decode module=repo status=skipped index={} plan_id={} error={}",
            index,
            id.map_or_else(|| "none".to_string(), |id| id.to_string()),
            reason
        );
        Self::Unreadable { id, raw }
    }

    fn id(&self) -> Option<PlanId> {
        match self {
            Self::Plan(plan) => Some(plan.id),
            Self::Unreadable { id, .. } => *id,
        }
    }

    fn to_value(&self) -> StorageResult<Value> {
        match self {
            Self::Plan(plan) => serde_json::to_value(plan).map_err(StorageError::Encode),
            Self::Unreadable { raw, .. } => Ok(raw.clone()),
        }
    }
}

fn readable(records: &[StoredRecord]) -> Vec<StudyPlan> {
    records
        .iter()
        .filter_map(|record| match record {
            StoredRecord::Plan(plan) => Some(plan.clone()),
            StoredRecord::Unreadable { .. } => None,
        })
        .collect()
}

/// Plan collection persistence keyed by `PLANS_KEY`.
pub struct PlanStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> PlanStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Loads every readable stored plan in insertion order.
    ///
    /// Missing, `null` or unreadable data yields an empty collection. The
    /// condition is logged and never raised.
    pub fn load_all(&self) -> Vec<StudyPlan> {
        match self.read_records() {
            Ok(records) => {
                let plans = readable(&records);
                debug!(
                    "event=plans_load module=repo status=ok count={} skipped={}",
                    plans.len(),
                    records.len() - plans.len()
                );
                plans
            }
            Err(err) => {
                warn!(
                    "event=plans_load module=repo status=degraded fallback=empty error={}",
                    err
                );
                Vec::new()
            }
        }
    }

    /// Appends one plan with a full read-modify-write of the collection.
    ///
    /// # Errors
    /// - `Validation` when the plan shape is invalid.
    /// - `Corrupt` when existing data is not a plan array; storage is left
    ///   as is.
    /// - `DuplicateId` when the id is already stored, readable or not.
    /// - `Db`/`QuotaExceeded` when the medium rejects the read or write.
    pub fn append(&self, plan: &StudyPlan) -> StorageResult<()> {
        let result = self.try_append(plan);
        match &result {
            Ok(()) => info!(
                "event=plan_append module=repo status=ok plan_id={}",
                plan.id
            ),
            Err(err) => error!(
                "event=plan_append module=repo status=error plan_id={} error={}",
                plan.id, err
            ),
        }
        result
    }

    /// Removes every record with `id` and returns the readable remainder.
    ///
    /// Unreadable records carrying `id` are removed too. An unknown id
    /// returns the unchanged collection without writing. Data that is not a
    /// plan array is treated as an empty collection and left untouched.
    ///
    /// # Errors
    /// - `Db`/`QuotaExceeded` when the medium rejects the read or write.
    pub fn remove(&self, id: PlanId) -> StorageResult<Vec<StudyPlan>> {
        let records = match self.read_records() {
            Ok(records) => records,
            Err(StorageError::Corrupt(message)) => {
                warn!(
                    "event=plan_remove module=repo status=degraded plan_id={} fallback=empty error={}",
                    id, message
                );
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=plan_remove module=repo status=error plan_id={} error={}",
                    id, err
                );
                return Err(err);
            }
        };

        let before = records.len();
        let kept: Vec<StoredRecord> = records
            .into_iter()
            .filter(|record| record.id() != Some(id))
            .collect();
        if kept.len() == before {
            debug!(
                "event=plan_remove module=repo status=noop plan_id={}",
                id
            );
            return Ok(readable(&kept));
        }

        if let Err(err) = self.write_records(&kept) {
            error!(
                "event=plan_remove module=repo status=error plan_id={} error={}",
                id, err
            );
            return Err(err);
        }
        info!(
            "event=plan_remove module=repo status=ok plan_id={} removed={}",
            id,
            before - kept.len()
        );
        Ok(readable(&kept))
    }

    /// Finds one stored plan by id.
    pub fn find_by_id(&self, id: PlanId) -> Option<StudyPlan> {
        self.load_all().into_iter().find(|plan| plan.id == id)
    }

    fn try_append(&self, plan: &StudyPlan) -> StorageResult<()> {
        plan.validate()?;
        let mut records = self.read_records()?;
        if records.iter().any(|stored| stored.id() == Some(plan.id)) {
            return Err(StorageError::DuplicateId(plan.id));
        }
        records.push(StoredRecord::Plan(plan.clone()));
        self.write_records(&records)
    }

    fn read_records(&self) -> StorageResult<Vec<StoredRecord>> {
        match self.storage.get_item(PLANS_KEY)? {
            Some(raw) => decode_records(&raw),
            None => Ok(Vec::new()),
        }
    }

    fn write_records(&self, records: &[StoredRecord]) -> StorageResult<()> {
        let values = records
            .iter()
            .map(StoredRecord::to_value)
            .collect::<StorageResult<Vec<Value>>>()?;
        let encoded = serde_json::to_string(&values).map_err(StorageError::Encode)?;
        self.storage.set_item(PLANS_KEY, &encoded)
    }
}

/// Splits the stored array into records; `null` counts as empty.
fn decode_records(raw: &str) -> StorageResult<Vec<StoredRecord>> {
    let values = serde_json::from_str::<Option<Vec<Value>>>(raw)
        .map_err(|err| StorageError::Corrupt(err.to_string()))?
        .unwrap_or_default();

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(index, value)| StoredRecord::decode(index, value))
        .collect())
}
