//! UI-host bindings for the study plan core.

pub mod api;
