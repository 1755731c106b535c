//! Engine systems.
//!
//! Submodules overview
//! - [`compassanimation`] – sheet switching, auto-facing and directional sprite playback
//! - [`time`] – update simulation time and delta

pub mod compassanimation;
pub mod time;
