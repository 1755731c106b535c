//! Compass animation systems.
//!
//! - [`compass_controller_system`] swaps an animator's sheet when its
//!   [`CompassAnimController`] requests a different state.
//! - [`compass_facing_system`] turns animators toward their
//!   [`FacingTarget`] using the quantizer.
//! - [`compass_animation_system`] advances playback, resolves the displayed
//!   direction and writes the selected frame into the [`Sprite`].
//!
//! # Frame Flow
//!
//! 1. `compass_controller_system` – sheet selection
//! 2. `compass_facing_system` – automatic facing
//! 3. `compass_animation_system` – timing and sprite output
//!
//! Direction changes take effect on the very next tick with no smoothing.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::compass::{CompassDirection, FacingVector, bucketize, heading_degrees};
use crate::components::compassanimator::{CompassAnimController, CompassAnimator};
use crate::components::facingtarget::{Billboard, CompassViewer, FacingTarget};
use crate::components::mapposition::MapPosition;
use crate::components::sprite::Sprite;
use crate::resources::compassconfig::CompassConfig;
use crate::resources::compasssheetstore::CompassSheetStore;
use crate::resources::worldtime::WorldTime;

/// Apply pending state changes from [`CompassAnimController`]s.
///
/// Requests naming an unknown state or sheet are logged once and ignored;
/// the animator keeps playing its current sheet.
pub fn compass_controller_system(
    mut query: Query<(Entity, &mut CompassAnimController, &mut CompassAnimator)>,
    store: Res<CompassSheetStore>,
) {
    for (entity, mut controller, mut animator) in query.iter_mut() {
        if !controller.is_pending() {
            continue;
        }
        let Some(key) = controller.requested_key() else {
            warn!(
                "{:?}: animation state {} out of range ({} sheets)",
                entity,
                controller.state,
                controller.sheet_keys.len()
            );
            controller.mark_active();
            continue;
        };
        match store.get(key) {
            Some(sheet) => {
                debug!(
                    "{:?}: switching compass sheet '{}' -> '{}'",
                    entity,
                    animator.sheet().name,
                    key
                );
                animator.switch_sheet(sheet.clone());
            }
            None => warn!("{:?}: compass sheet '{}' not found", entity, key),
        }
        controller.mark_active();
    }
}

/// Quantize the direction toward each [`FacingTarget`] into automatic facing.
///
/// Targets without a [`MapPosition`] (e.g. despawned) leave the facing as is.
pub fn compass_facing_system(
    mut query: Query<(&MapPosition, &FacingTarget, &mut CompassAnimator)>,
    positions: Query<&MapPosition>,
    config: Option<Res<CompassConfig>>,
) {
    let dead_zone = config.map(|c| c.dead_zone).unwrap_or_default();
    for (position, target, mut animator) in query.iter_mut() {
        let Ok(target_pos) = positions.get(target.target) else {
            continue;
        };
        let facing = FacingVector::quantize(target_pos.pos - position.pos, dead_zone);
        animator.set_auto_facing(facing);
    }
}

/// Direction from `from` toward `to`, or `None` when they coincide.
pub fn side_toward(from: &MapPosition, to: &MapPosition) -> Option<CompassDirection> {
    let delta = to.pos - from.pos;
    if delta.length_squared() <= f32::EPSILON || !delta.is_finite() {
        return None;
    }
    Some(bucketize(heading_degrees(delta)))
}

/// Advance every [`CompassAnimator`] and update its [`Sprite`].
///
/// Contract
/// - Reads [`WorldTime`] for the scaled delta.
/// - [`Billboard`] entities are shown as seen from the first [`CompassViewer`];
///   others, or all of them when no viewer exists, show their facing.
/// - Animators without a [`MapPosition`] still tick; they show their facing.
pub fn compass_animation_system(
    mut query: Query<(
        Option<&MapPosition>,
        &mut CompassAnimator,
        Option<&mut Sprite>,
        Has<Billboard>,
    )>,
    viewers: Query<&MapPosition, With<CompassViewer>>,
    time: Res<WorldTime>,
) {
    let viewer = viewers.iter().next().copied();
    for (position, mut animator, sprite, billboard) in query.iter_mut() {
        let viewer_side = match (billboard, position, viewer.as_ref()) {
            (true, Some(position), Some(viewer)) => side_toward(position, viewer),
            _ => None,
        };
        animator.tick(time.delta, viewer_side);
        if let Some(mut sprite) = sprite {
            sprite.show(animator.current_sprite());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_toward_cardinals() {
        let origin = MapPosition::new(0.0, 0.0);
        let side = |x, y| side_toward(&origin, &MapPosition::new(x, y));
        assert_eq!(side(0.0, -5.0), Some(CompassDirection::South));
        assert_eq!(side(3.0, 3.0), Some(CompassDirection::NorthEast));
        assert_eq!(side(-2.0, 0.1), Some(CompassDirection::West));
    }

    #[test]
    fn test_side_toward_same_position_is_none() {
        let p = MapPosition::new(4.0, 4.0);
        assert_eq!(side_toward(&p, &p), None);
    }
}
