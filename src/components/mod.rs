//! ECS components for entities.
//!
//! Submodules overview:
//! - [`compass`] – compass directions, facing vectors and the angle/vector quantizers
//! - [`compassanimator`] – directional animation state, animator and sheet controller
//! - [`facingtarget`] – auto-targeting, viewer and billboard markers
//! - [`mapposition`] – world-space position on the ground plane
//! - [`sprite`] – texture key and frame rectangle to draw

pub mod compass;
pub mod compassanimator;
pub mod facingtarget;
pub mod mapposition;
pub mod sprite;
