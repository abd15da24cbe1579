// AnomalyDash - app/mod.rs
//
// Application layer: orchestration, state management, the inference
// client, and background detection.
// Dependencies: core, platform, util.
// Must NOT depend on: ui.

pub mod api;
pub mod detect;
pub mod state;
