// AnomalyDash - ui/panels/mod.rs

pub mod about;
pub mod chart;
pub mod statistics;
pub mod status;
pub mod uploader;
