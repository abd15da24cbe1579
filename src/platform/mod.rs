// AnomalyDash - platform/mod.rs
//
// Platform abstraction layer: config directories and filesystem access.
// Dependencies: util, core (model identifiers only), directories crate.
// Must NOT depend on: app, ui.

pub mod config;
pub mod fs;
