//! Pure projections from stored plans to display data.
//!
//! # Responsibility
//! - Compute derived values (remaining days, duration labels, summaries).
//! - Build the flat flowchart node sequence for one plan.
//!
//! # Invariants
//! - Every function here is pure given its inputs and the supplied instant.
//! - Results are recomputed per render; nothing is cached.

pub mod derived;
pub mod flowchart;
