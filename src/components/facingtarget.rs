use bevy_ecs::prelude::*;

/// Automatically turn a [`CompassAnimator`](super::compassanimator::CompassAnimator)
/// toward another entity's [`MapPosition`](super::mapposition::MapPosition).
#[derive(Component, Clone, Copy, Debug)]
pub struct FacingTarget {
    pub target: Entity,
}

impl FacingTarget {
    pub fn new(target: Entity) -> Self {
        FacingTarget { target }
    }
}

/// Marks the entity billboards are drawn for (usually the player or camera).
///
/// Only the first viewer found is used.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct CompassViewer;

/// Draw the side of the entity that faces the [`CompassViewer`] instead of
/// the raw facing. Entities without it are shown from a fixed camera.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Billboard;
