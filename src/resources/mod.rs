//! ECS resources made available to systems.
//!
//! Overview
//! - `compassconfig` – INI-backed animation, dead-zone and layout settings
//! - `compasssheetstore` – named compass sheets and their JSON manifests
//! - `spritetable` – frame × direction tables and sheet layouts
//! - `worldtime` – simulation time and delta
pub mod compassconfig;
pub mod compasssheetstore;
pub mod spritetable;
pub mod worldtime;
