//! Flowchart node model.
//!
//! Nodes form a flat ordered sequence; renderers group topics and
//! sub-topics by `NodeKind` rather than by nesting.

use serde::{Deserialize, Serialize};

/// Discriminant of a `FlowchartNode`, usable without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Start,
    Exam,
    Topic,
    Subtopic,
    End,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Exam => "exam",
            Self::Topic => "topic",
            Self::Subtopic => "subtopic",
            Self::End => "end",
        }
    }
}

/// One visual node of a plan breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlowchartNode {
    Start,
    #[serde(rename_all = "camelCase")]
    Exam {
        exam_name: String,
        exam_date: String,
        remaining_days: u32,
    },
    #[serde(rename_all = "camelCase")]
    Topic {
        label: String,
        duration_label: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Subtopic {
        label: String,
        duration_label: Option<String>,
    },
    End,
}

impl FlowchartNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Start => NodeKind::Start,
            Self::Exam { .. } => NodeKind::Exam,
            Self::Topic { .. } => NodeKind::Topic,
            Self::Subtopic { .. } => NodeKind::Subtopic,
            Self::End => NodeKind::End,
        }
    }
}

/// Ordered flowchart for one plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flowchart {
    pub nodes: Vec<FlowchartNode>,
}

impl Flowchart {
    /// Returns the kind sequence, e.g. `[Start, Exam, Topic, End]`.
    pub fn kinds(&self) -> Vec<NodeKind> {
        self.nodes.iter().map(FlowchartNode::kind).collect()
    }
}
