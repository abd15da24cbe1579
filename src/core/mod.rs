// AnomalyDash - core/mod.rs
//
// Core domain logic. Pure data and state transitions, no UI.
// Dependencies: util (errors, constants).
// Must NOT depend on: app, ui, platform.

pub mod history;
pub mod model;
pub mod uploader;
