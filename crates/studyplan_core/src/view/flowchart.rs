//! Flowchart builder.
//!
//! Order is fixed: start, exam, topics, sub-topics (only when present), end.
//! The builder trusts plan-level validation and has no failure modes.

use crate::model::flowchart::{Flowchart, FlowchartNode};
use crate::model::plan::StudyPlan;
use crate::view::derived::{duration_label, plan_remaining_days};
use chrono::{DateTime, Utc};

/// Maps one plan into its ordered flowchart node sequence.
pub fn build_flowchart(plan: &StudyPlan, now: DateTime<Utc>) -> Flowchart {
    let mut nodes = Vec::with_capacity(plan.study_topics.len() + plan.sub_topics.len() + 3);

    nodes.push(FlowchartNode::Start);
    nodes.push(FlowchartNode::Exam {
        exam_name: plan.exam_name.clone(),
        exam_date: plan.exam_date.clone(),
        remaining_days: plan_remaining_days(plan, now),
    });

    let topic_label = duration_label(plan.time_per_topic);
    nodes.extend(plan.study_topics.iter().map(|topic| FlowchartNode::Topic {
        label: topic.clone(),
        duration_label: topic_label.clone(),
    }));

    let sub_topic_label = duration_label(plan.time_per_sub_topic);
    nodes.extend(plan.sub_topics.iter().map(|sub_topic| FlowchartNode::Subtopic {
        label: sub_topic.clone(),
        duration_label: sub_topic_label.clone(),
    }));

    nodes.push(FlowchartNode::End);
    Flowchart { nodes }
}
