//! FFI use-case API for UI-host calls.
//!
//! # Responsibility
//! - Expose submit/list/delete/view plan commands to a Flutter host via FRB.
//! - Flatten core results into plain response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures are reported in `message`, never thrown.
//! - Derived values use the wall clock at call time.

use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use studyplan_core::db::open_db;
use studyplan_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    FlowchartNode, PlanInput, PlanService, PlanStore, PlanSummary, SqliteStorage, SystemClock,
};

static ENTRY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
/// Repeating the call with the same `level + log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Flat list-card item for the saved-plans list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanListItem {
    pub plan_id: i64,
    pub exam_name: String,
    pub exam_date: String,
    pub remaining_days: u32,
    pub topics: String,
}

/// One flowchart node flattened for the host renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowchartItem {
    /// `start|exam|topic|subtopic|end`.
    pub kind: String,
    /// Exam name, topic label, or `Start`/`End`.
    pub label: String,
    /// Exam date text for `exam` nodes.
    pub exam_date: Option<String>,
    /// Remaining days for `exam` nodes.
    pub remaining_days: Option<u32>,
    /// Duration badge for topic nodes.
    pub duration_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanActionResponse {
    pub ok: bool,
    pub plan_id: Option<i64>,
    /// Flowchart of the created plan; empty on failure.
    pub flowchart: Vec<FlowchartItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanListResponse {
    pub ok: bool,
    /// Newest first.
    pub items: Vec<PlanListItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowchartResponse {
    pub found: bool,
    pub items: Vec<FlowchartItem>,
    pub message: String,
}

/// Validates and saves one plan from form fields.
///
/// Duration fields are raw text; blank or non-numeric values count as 0.
#[allow(clippy::too_many_arguments)]
#[flutter_rust_bridge::frb(sync)]
pub fn entry_create_plan(
    exam_name: String,
    exam_date: String,
    study_topics: String,
    sub_topics: String,
    topic_hours: Option<String>,
    topic_minutes: Option<String>,
    sub_topic_hours: Option<String>,
    sub_topic_minutes: Option<String>,
) -> PlanActionResponse {
    let input = PlanInput {
        exam_name,
        exam_date,
        study_topics,
        sub_topics,
        topic_hours,
        topic_minutes,
        sub_topic_hours,
        sub_topic_minutes,
    };

    let result =
        with_plan_service(|service| service.submit(&input).map_err(|err| err.to_string()));
    match result {
        Ok(submitted) => PlanActionResponse {
            ok: true,
            plan_id: Some(submitted.plan.id),
            flowchart: submitted.flowchart.nodes.iter().map(to_flowchart_item).collect(),
            message: "Plan saved.".to_string(),
        },
        Err(err) => PlanActionResponse {
            ok: false,
            plan_id: None,
            flowchart: Vec::new(),
            message: format!("entry_create_plan failed: {err}"),
        },
    }
}

/// Lists saved plans, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_list_plans() -> PlanListResponse {
    match with_plan_service(|service| Ok(service.list_summaries())) {
        Ok(summaries) => list_response(summaries),
        Err(err) => PlanListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("entry_list_plans failed: {err}"),
        },
    }
}

/// Deletes a plan and returns the refreshed list.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_delete_plan(plan_id: i64) -> PlanListResponse {
    let result = with_plan_service(|service| {
        service.delete(plan_id).map_err(|err| err.to_string())?;
        Ok(service.list_summaries())
    });
    match result {
        Ok(summaries) => list_response(summaries),
        Err(err) => PlanListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("entry_delete_plan failed: {err}"),
        },
    }
}

/// Rebuilds the flowchart of one saved plan.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_view_plan(plan_id: i64) -> FlowchartResponse {
    match with_plan_service(|service| Ok(service.view(plan_id))) {
        Ok(Some(flowchart)) => FlowchartResponse {
            found: true,
            items: flowchart.nodes.iter().map(to_flowchart_item).collect(),
            message: String::new(),
        },
        Ok(None) => FlowchartResponse {
            found: false,
            items: Vec::new(),
            message: format!("plan not found: {plan_id}"),
        },
        Err(err) => FlowchartResponse {
            found: false,
            items: Vec::new(),
            message: format!("entry_view_plan failed: {err}"),
        },
    }
}

fn list_response(summaries: Vec<PlanSummary>) -> PlanListResponse {
    let message = if summaries.is_empty() {
        "No previous plans found.".to_string()
    } else {
        format!("Found {} plan(s).", summaries.len())
    };
    PlanListResponse {
        ok: true,
        items: summaries.into_iter().map(to_list_item).collect(),
        message,
    }
}

fn resolve_entry_db_path() -> PathBuf {
    ENTRY_DB_PATH.get_or_init(default_entry_db_path).clone()
}

#[cfg(not(test))]
fn default_entry_db_path() -> PathBuf {
    studyplan_core::AppConfig::from_env().db_path
}

#[cfg(test)]
fn default_entry_db_path() -> PathBuf {
    std::env::temp_dir().join(format!("studyplan-ffi-test-{}.sqlite3", std::process::id()))
}

fn with_plan_service<T>(
    f: impl FnOnce(&PlanService<SqliteStorage<'_>, SystemClock>) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = resolve_entry_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=ffi_db_open module=ffi status=error error={err}");
        format!("plan storage open failed: {err}")
    })?;
    let service = PlanService::new(PlanStore::new(SqliteStorage::new(&conn)), SystemClock);
    f(&service)
}

fn to_list_item(summary: PlanSummary) -> PlanListItem {
    PlanListItem {
        plan_id: summary.id,
        exam_name: summary.exam_name,
        exam_date: summary.exam_date,
        remaining_days: summary.remaining_days,
        topics: summary.topics_label,
    }
}

fn to_flowchart_item(node: &FlowchartNode) -> FlowchartItem {
    let kind = node.kind().as_str().to_string();
    match node {
        FlowchartNode::Start => blank_item(kind, "Start"),
        FlowchartNode::End => blank_item(kind, "End"),
        FlowchartNode::Exam {
            exam_name,
            exam_date,
            remaining_days,
        } => FlowchartItem {
            kind,
            label: exam_name.clone(),
            exam_date: Some(exam_date.clone()),
            remaining_days: Some(*remaining_days),
            duration_label: None,
        },
        FlowchartNode::Topic {
            label,
            duration_label,
        }
        | FlowchartNode::Subtopic {
            label,
            duration_label,
        } => FlowchartItem {
            kind,
            label: label.clone(),
            exam_date: None,
            remaining_days: None,
            duration_label: duration_label.clone(),
        },
    }
}

fn blank_item(kind: String, label: &str) -> FlowchartItem {
    FlowchartItem {
        kind,
        label: label.to_string(),
        exam_date: None,
        remaining_days: None,
        duration_label: None,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, entry_create_plan, entry_delete_plan, entry_list_plans, entry_view_plan,
        init_logging, ping, to_flowchart_item,
    };
    use std::time::{SystemTime, UNIX_EPOCH};
    use studyplan_core::FlowchartNode;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn flowchart_item_flattens_exam_node() {
        let item = to_flowchart_item(&FlowchartNode::Exam {
            exam_name: "Bio".to_string(),
            exam_date: "2099-01-01".to_string(),
            remaining_days: 4,
        });
        assert_eq!(item.kind, "exam");
        assert_eq!(item.label, "Bio");
        assert_eq!(item.remaining_days, Some(4));
    }

    #[test]
    fn create_plan_rejects_missing_topics_without_saving() {
        let name = unique_token("no-topics");
        let response = entry_create_plan(
            name.clone(),
            "2099-01-01".to_string(),
            " , ".to_string(),
            String::new(),
            None,
            None,
            None,
            None,
        );
        assert!(!response.ok);
        assert!(response.message.contains("study topic"));
        assert!(entry_list_plans()
            .items
            .iter()
            .all(|item| item.exam_name != name));
    }

    #[test]
    fn create_view_and_delete_plan_roundtrip() {
        let name = unique_token("roundtrip");
        let created = entry_create_plan(
            name.clone(),
            "2099-01-01".to_string(),
            "Algebra, Geometry".to_string(),
            "Proofs".to_string(),
            Some("1".to_string()),
            Some("30".to_string()),
            None,
            None,
        );
        assert!(created.ok, "{}", created.message);
        let plan_id = created.plan_id.expect("created plan should return plan_id");
        let kinds: Vec<&str> = created.flowchart.iter().map(|item| item.kind.as_str()).collect();
        assert_eq!(kinds, vec!["start", "exam", "topic", "topic", "subtopic", "end"]);
        assert_eq!(created.flowchart[2].duration_label.as_deref(), Some("1h 30m"));

        let listed = entry_list_plans();
        assert!(listed.ok, "{}", listed.message);
        assert!(listed.items.iter().any(|item| item.plan_id == plan_id));

        let viewed = entry_view_plan(plan_id);
        assert!(viewed.found, "{}", viewed.message);
        assert_eq!(viewed.items, created.flowchart);

        let after_delete = entry_delete_plan(plan_id);
        assert!(after_delete.ok, "{}", after_delete.message);
        assert!(after_delete.items.iter().all(|item| item.plan_id != plan_id));
        assert!(!entry_view_plan(plan_id).found);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
