//! Persistence layer for the plan collection.
//!
//! # Responsibility
//! - Define the key-value medium contract and its SQLite/in-memory backends.
//! - Keep JSON layout and read-modify-write details out of the service layer.
//!
//! # Invariants
//! - Writes validate plans before they reach the medium.
//! - Callers never mutate stored plans in place; every change replaces the
//!   whole collection.

pub mod kv_storage;
pub mod plan_store;
