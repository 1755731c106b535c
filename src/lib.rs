//! JimJam compass animator library.
//!
//! Directional (8-way) sprite selection for billboard and top-down pixel-art
//! characters: facing quantization, angle bucketing, sprite sheet reordering
//! and a frame-timed animation driver, exposed as ECS components, resources
//! and systems.

pub mod components;
pub mod error;
pub mod game;
pub mod resources;
pub mod systems;
