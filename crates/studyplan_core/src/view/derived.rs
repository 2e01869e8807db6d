//! Derived-value calculator.

use crate::model::plan::{PlanId, StudyDuration, StudyPlan};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Label used when a duration has neither hours nor minutes.
pub const NOT_SPECIFIED: &str = "Not specified";

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days left until `exam_date`, rounded up and clamped at zero.
///
/// The exam day starts at UTC midnight, so an exam tomorrow reports 1 for any
/// instant today and an exam today (or earlier) reports 0.
pub fn remaining_days(exam_date: NaiveDate, now: DateTime<Utc>) -> u32 {
    let exam_start = exam_date.and_time(chrono::NaiveTime::MIN).and_utc();
    let diff_ms = exam_start.timestamp_millis() - now.timestamp_millis();
    if diff_ms <= 0 {
        return 0;
    }
    let days = diff_ms.div_euclid(MILLIS_PER_DAY) + i64::from(diff_ms % MILLIS_PER_DAY != 0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Remaining days for a stored plan; unparseable dates report 0.
pub fn plan_remaining_days(plan: &StudyPlan, now: DateTime<Utc>) -> u32 {
    plan.exam_day()
        .map_or(0, |exam_date| remaining_days(exam_date, now))
}

/// Formats a duration as `"<H>h <M>m"`, omitting zero components.
pub fn format_duration(duration: StudyDuration) -> String {
    match (duration.hours, duration.minutes) {
        (0, 0) => NOT_SPECIFIED.to_string(),
        (hours, 0) => format!("{hours}h"),
        (0, minutes) => format!("{minutes}m"),
        (hours, minutes) => format!("{hours}h {minutes}m"),
    }
}

/// Duration label for node badges; `None` instead of the sentinel.
pub fn duration_label(duration: StudyDuration) -> Option<String> {
    if duration.is_zero() {
        None
    } else {
        Some(format_duration(duration))
    }
}

/// List-card projection of a saved plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub id: PlanId,
    pub exam_name: String,
    pub exam_date: String,
    pub remaining_days: u32,
    /// Topics joined with `", "`.
    pub topics_label: String,
    pub topic_time_label: String,
    pub sub_topic_time_label: String,
}

pub fn summarize(plan: &StudyPlan, now: DateTime<Utc>) -> PlanSummary {
    PlanSummary {
        id: plan.id,
        exam_name: plan.exam_name.clone(),
        exam_date: plan.exam_date.clone(),
        remaining_days: plan_remaining_days(plan, now),
        topics_label: plan.study_topics.join(", "),
        topic_time_label: format_duration(plan.time_per_topic),
        sub_topic_time_label: format_duration(plan.time_per_sub_topic),
    }
}
