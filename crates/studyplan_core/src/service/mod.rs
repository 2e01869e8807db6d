//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model, store and view calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod plan_service;
