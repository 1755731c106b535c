//! World setup and the headless demo scene.
//!
//! [`build_world`] inserts the shared resources, [`build_schedule`] orders the
//! compass systems, and [`run_frame`] advances one frame. The demo scene has:
//! - a viewer orbiting the scene center,
//! - a billboard knight turned toward a torch and switching between
//!   idle/walk/attack sheets,
//! - a top-down villager using a PVGames sheet that starts with a random
//!   facing, then gets its facing pushed explicitly and rotated over time.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;

use crate::components::compass::FacingVector;
use crate::components::compassanimator::{CompassAnimController, CompassAnimator};
use crate::components::facingtarget::{Billboard, CompassViewer, FacingTarget};
use crate::components::mapposition::MapPosition;
use crate::components::sprite::Sprite;
use crate::error::CompassError;
use crate::resources::compassconfig::CompassConfig;
use crate::resources::compasssheetstore::CompassSheetStore;
use crate::resources::worldtime::WorldTime;
use crate::systems::compassanimation::{
    compass_animation_system, compass_controller_system, compass_facing_system,
};
use crate::systems::time::update_world_time;

/// Sheets used by [`spawn_demo_scene`] when no manifest file is given.
pub const DEMO_MANIFEST: &str = r#"[
    { "name": "knight_idle", "texture_key": "knight", "frame_width": 32.0, "frame_height": 48.0,
      "frames_per_direction": 2, "layout": "canonical", "frame_duration": 0.4 },
    { "name": "knight_walk", "texture_key": "knight", "frame_width": 32.0, "frame_height": 48.0,
      "frames_per_direction": 4, "layout": "canonical", "origin_y": 48.0 },
    { "name": "knight_attack", "texture_key": "knight", "frame_width": 32.0, "frame_height": 48.0,
      "frames_per_direction": 3, "layout": "canonical", "origin_y": 96.0, "frame_duration": 0.1 },
    { "name": "villager_walk", "texture_key": "villager", "frame_width": 64.0, "frame_height": 64.0,
      "frames_per_direction": 6, "layout": "pvgames" }
]"#;

const KNIGHT_STATES: [&str; 3] = ["knight_idle", "knight_walk", "knight_attack"];
const VIEWER_ORBIT_RADIUS: f32 = 6.0;
/// Radians per second.
const VIEWER_ORBIT_SPEED: f32 = 0.8;

/// Names the demo entities so the caller can report on them.
#[derive(Debug, Clone, Copy)]
pub struct DemoScene {
    pub viewer: Entity,
    pub knight: Entity,
    pub villager: Entity,
}

/// Create a world holding the config, sheet store and clock.
pub fn build_world(config: CompassConfig, store: CompassSheetStore) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
    world.insert_resource(config);
    world.insert_resource(store);
    world
}

/// Compass systems in their per-frame order.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            compass_controller_system,
            compass_facing_system,
            compass_animation_system,
        )
            .chain(),
    );
    schedule
}

/// Advance the clock by `dt` seconds and run the compass systems once.
pub fn run_frame(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
}

/// Spawn the demo entities. Requires the [`DEMO_MANIFEST`] sheets (or sheets
/// with the same names) in the [`CompassSheetStore`].
pub fn spawn_demo_scene(world: &mut World) -> Result<DemoScene, CompassError> {
    let (knight_sheet, villager_sheet) = {
        let store = world.resource::<CompassSheetStore>();
        let find = |name: &str| {
            store
                .get(name)
                .cloned()
                .ok_or_else(|| CompassError::Manifest(format!("missing demo sheet '{}'", name)))
        };
        (find(KNIGHT_STATES[0])?, find("villager_walk")?)
    };

    let viewer = world
        .spawn((
            MapPosition::new(0.0, -VIEWER_ORBIT_RADIUS),
            CompassViewer,
        ))
        .id();
    let torch = world.spawn(MapPosition::new(0.0, 4.0)).id();
    let knight = world
        .spawn((
            MapPosition::new(0.0, 0.0),
            CompassAnimator::new(knight_sheet),
            CompassAnimController::new(KNIGHT_STATES),
            FacingTarget::new(torch),
            Billboard,
            Sprite::default(),
        ))
        .id();
    let villager = world
        .spawn((
            MapPosition::new(-3.0, 2.0),
            CompassAnimator::new(villager_sheet).with_random_facing(),
            Sprite::default(),
        ))
        .id();

    info!("Spawned demo scene: viewer {:?}, knight {:?}, villager {:?}", viewer, knight, villager);
    Ok(DemoScene {
        viewer,
        knight,
        villager,
    })
}

/// Scripted demo behavior for frame number `frame` (elapsed `t` seconds):
/// the viewer orbits, the knight cycles its states and the villager turns.
pub fn drive_demo(world: &mut World, scene: &DemoScene, frame: u64, t: f32) {
    let angle = t * VIEWER_ORBIT_SPEED;
    if let Some(mut pos) = world.get_mut::<MapPosition>(scene.viewer) {
        // starts due South of the center and turns counter-clockwise
        pos.pos = Vec2::new(angle.sin(), -angle.cos()) * VIEWER_ORBIT_RADIUS;
    }
    if frame > 0 && frame % 20 == 0 {
        if let Some(mut controller) = world.get_mut::<CompassAnimController>(scene.knight) {
            let next = (controller.state + 1) % controller.sheet_keys.len();
            controller.set_state(next);
        }
    }
    if frame > 0 && frame % 8 == 0 {
        if let Some(mut animator) = world.get_mut::<CompassAnimator>(scene.villager) {
            let next = animator.facing().rotated(1);
            animator.set_direction_source(FacingVector::from(next));
        }
    }
}
