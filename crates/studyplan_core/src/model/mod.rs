//! Domain model for study plans and their derived flowchart view.
//!
//! # Responsibility
//! - Define the persisted plan record and the transient flowchart nodes.
//!
//! # Invariants
//! - Plans are write-once; there is no in-place update path.
//! - Flowchart nodes are rebuilt on every render and never persisted.

pub mod flowchart;
pub mod plan;
