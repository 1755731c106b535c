//! Directional sprite animation state.
//!
//! - [`AnimatorState`] holds the playback fields and a pure [`AnimatorState::step`]
//!   so the timing can be tested without a running world.
//! - [`CompassAnimator`] owns one [`CompassSheet`] and resolves the sprite to
//!   draw from the current frame and facing.
//! - [`CompassAnimController`] switches an animator between named sheets
//!   (dead, idle, move, attack, ...).
//!
//! See [`crate::systems::compassanimation`] for the systems driving them.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::compass::{CompassDirection, FacingVector};
use crate::error::CompassError;
use crate::resources::compasssheetstore::{CompassSheet, SpriteFrame};
use crate::resources::spritetable::{DIRECTIONS, SheetLayout, SpriteTable};

/// Countdown values this close to zero count as elapsed.
const TIMER_EPSILON: f32 = 1e-6;

/// Playback state of a directional animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimatorState {
    pub frame_index: usize,
    /// Seconds left before the next frame.
    pub timer: f32,
    /// Direction currently displayed.
    pub direction: CompassDirection,
}

impl AnimatorState {
    pub fn new(frame_duration: f32) -> Self {
        AnimatorState {
            frame_index: 0,
            timer: frame_duration,
            direction: CompassDirection::South,
        }
    }

    /// Advance the countdown by `dt` seconds.
    ///
    /// When the timer runs out the frame advances once, wrapping at
    /// `frames_per_direction`, and the timer restarts at `frame_duration`.
    /// Negative deltas are ignored.
    pub fn step(self, frame_duration: f32, frames_per_direction: usize, dt: f32) -> Self {
        if frames_per_direction == 0 {
            return self;
        }
        let mut next = self;
        next.timer -= dt.max(0.0);
        if next.timer <= TIMER_EPSILON {
            next.frame_index = (next.frame_index + 1) % frames_per_direction;
            next.timer = frame_duration;
        }
        next
    }

    /// Replace the displayed direction, keeping the current one on `None`.
    pub fn with_direction(self, direction: Option<CompassDirection>) -> Self {
        AnimatorState {
            direction: direction.unwrap_or(self.direction),
            ..self
        }
    }
}

/// Billboard sprite that picks one of 8 directional frames every tick.
///
/// Facing comes from two sources: the automatic one written by
/// [`compass_facing_system`](crate::systems::compassanimation::compass_facing_system)
/// from a [`FacingTarget`](crate::components::facingtarget::FacingTarget), and an
/// explicit one pushed with [`set_direction_source`](Self::set_direction_source),
/// which wins while present. A source of `(0, 0)` keeps the previous facing.
#[derive(Component, Debug, Clone)]
pub struct CompassAnimator {
    sheet: CompassSheet,
    pub state: AnimatorState,
    auto_facing: FacingVector,
    pushed_facing: Option<FacingVector>,
    facing: CompassDirection,
}

impl CompassAnimator {
    pub fn new(sheet: CompassSheet) -> Self {
        let state = AnimatorState::new(sheet.frame_duration);
        CompassAnimator {
            sheet,
            state,
            auto_facing: FacingVector::NONE,
            pushed_facing: None,
            facing: CompassDirection::South,
        }
    }

    /// Start facing `facing` (ignored if it has no direction).
    pub fn with_facing(mut self, facing: FacingVector) -> Self {
        self.auto_facing = facing;
        if let Some(direction) = facing.direction() {
            self.facing = direction;
            self.state.direction = direction;
        }
        self
    }

    /// Start facing one of the 8 directions at random.
    pub fn with_random_facing(self) -> Self {
        self.with_facing(FacingVector::random())
    }

    /// Push an explicit facing that overrides the automatic one.
    pub fn set_direction_source(&mut self, facing: FacingVector) {
        self.pushed_facing = Some(facing);
    }

    /// Drop the pushed facing and go back to the automatic one.
    pub fn clear_direction_source(&mut self) {
        self.pushed_facing = None;
    }

    pub fn set_auto_facing(&mut self, facing: FacingVector) {
        self.auto_facing = facing;
    }

    pub fn has_pushed_facing(&self) -> bool {
        self.pushed_facing.is_some()
    }

    /// Last valid direction the entity faced, independent of any viewer.
    pub fn facing(&self) -> CompassDirection {
        self.facing
    }

    pub fn sheet(&self) -> &CompassSheet {
        &self.sheet
    }

    /// Sprite selected for the current frame and direction.
    pub fn current_sprite(&self) -> &SpriteFrame {
        // a sheet is never empty, so there is at least one row
        let frame = self.state.frame_index % self.sheet.frames_per_direction();
        &self.sheet.table.as_slice()[frame * DIRECTIONS + self.state.direction.index()]
    }

    /// Rebuild the table from a new flat frame array.
    ///
    /// On error the current table stays in place. On success playback
    /// restarts from the first frame.
    pub fn rebuild_table(
        &mut self,
        flat: Vec<SpriteFrame>,
        layout: SheetLayout,
    ) -> Result<(), CompassError> {
        let table = SpriteTable::from_layout(flat, layout)?;
        self.sheet.table = table.into();
        self.restart();
        Ok(())
    }

    /// Play a different sheet from its first frame, keeping the facing.
    pub fn switch_sheet(&mut self, sheet: CompassSheet) {
        self.sheet = sheet;
        self.restart();
    }

    fn restart(&mut self) {
        self.state = AnimatorState {
            frame_index: 0,
            timer: self.sheet.frame_duration,
            direction: self.state.direction,
        };
    }

    /// Advance playback by `dt` and recompute the displayed direction.
    ///
    /// With a `viewer_side` (direction from the entity toward the viewer) the
    /// displayed direction is the facing seen from that side; without one the
    /// facing is shown directly.
    pub fn tick(&mut self, dt: f32, viewer_side: Option<CompassDirection>) {
        let source = self.pushed_facing.unwrap_or(self.auto_facing);
        if let Some(direction) = source.direction() {
            self.facing = direction;
        }
        let displayed = match viewer_side {
            Some(side) => self.facing.relative_to(side),
            None => self.facing,
        };
        self.state = self
            .state
            .step(
                self.sheet.frame_duration,
                self.sheet.frames_per_direction(),
                dt,
            )
            .with_direction(Some(displayed));
    }
}

/// Switches a [`CompassAnimator`] between named sheets.
///
/// `state` is the requested index into `sheet_keys`; the controller system
/// applies it when it differs from the active one.
#[derive(Component, Debug, Clone)]
pub struct CompassAnimController {
    pub sheet_keys: Vec<String>,
    pub state: usize,
    active: Option<usize>,
}

impl CompassAnimController {
    pub fn new<I, S>(sheet_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CompassAnimController {
            sheet_keys: sheet_keys.into_iter().map(Into::into).collect(),
            state: 0,
            active: None,
        }
    }

    pub fn with_state(mut self, state: usize) -> Self {
        self.state = state;
        self
    }

    pub fn set_state(&mut self, state: usize) {
        self.state = state;
    }

    /// Request the state named `key`. Returns false if no such key exists.
    pub fn set_state_key(&mut self, key: &str) -> bool {
        match self.sheet_keys.iter().position(|k| k == key) {
            Some(index) => {
                self.state = index;
                true
            }
            None => false,
        }
    }

    pub fn active_state(&self) -> Option<usize> {
        self.active
    }

    pub fn requested_key(&self) -> Option<&str> {
        self.sheet_keys.get(self.state).map(String::as_str)
    }

    pub fn is_pending(&self) -> bool {
        self.active != Some(self.state)
    }

    pub(crate) fn mark_active(&mut self) {
        self.active = Some(self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::sync::Arc;

    fn frames(count: usize) -> Vec<SpriteFrame> {
        let tex: Arc<str> = Arc::from("hero");
        (0..count)
            .map(|i| SpriteFrame {
                tex_key: tex.clone(),
                offset: Vec2::new(i as f32, 0.0),
                width: 1.0,
                height: 1.0,
            })
            .collect()
    }

    fn sheet(name: &str, frames_per_direction: usize) -> CompassSheet {
        CompassSheet::new(name, frames(frames_per_direction * 8), SheetLayout::Canonical, 0.15)
            .unwrap()
    }

    #[test]
    fn test_step_advances_once_after_cumulative_duration() {
        let mut state = AnimatorState::new(0.15);
        let mut advanced_on = Vec::new();
        for tick in 1..=4 {
            let before = state.frame_index;
            state = state.step(0.15, 4, 0.05);
            if state.frame_index != before {
                advanced_on.push(tick);
            }
        }
        assert_eq!(advanced_on, vec![3]);
        assert_eq!(state.frame_index, 1);
    }

    #[test]
    fn test_step_wraps_frame_index() {
        let mut state = AnimatorState::new(0.1);
        state.frame_index = 2;
        let state = state.step(0.1, 3, 0.1);
        assert_eq!(state.frame_index, 0);
        assert!((state.timer - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_step_large_delta_advances_one_frame() {
        let state = AnimatorState::new(0.1).step(0.1, 8, 5.0);
        assert_eq!(state.frame_index, 1);
    }

    #[test]
    fn test_step_ignores_negative_delta() {
        let state = AnimatorState::new(0.1).step(0.1, 8, -1.0);
        assert_eq!(state, AnimatorState::new(0.1));
    }

    #[test]
    fn test_with_direction_none_keeps_previous() {
        let state = AnimatorState::new(0.1).with_direction(Some(CompassDirection::West));
        assert_eq!(state.with_direction(None).direction, CompassDirection::West);
    }

    #[test]
    fn test_current_sprite_follows_frame_and_direction() {
        let mut anim = CompassAnimator::new(sheet("walk", 2));
        anim.set_direction_source(FacingVector::new(1, 0));
        anim.tick(0.0, None);
        assert_eq!(anim.state.direction, CompassDirection::East);
        assert_eq!(anim.current_sprite().offset.x, 2.0);

        anim.tick(0.15, None);
        assert_eq!(anim.state.frame_index, 1);
        assert_eq!(anim.current_sprite().offset.x, 10.0);
    }

    #[test]
    fn test_pushed_facing_overrides_auto() {
        let mut anim = CompassAnimator::new(sheet("idle", 1));
        anim.set_auto_facing(FacingVector::new(0, 1));
        anim.set_direction_source(FacingVector::new(-1, 0));
        anim.tick(0.01, None);
        assert_eq!(anim.facing(), CompassDirection::West);

        anim.clear_direction_source();
        anim.tick(0.01, None);
        assert_eq!(anim.facing(), CompassDirection::North);
    }

    #[test]
    fn test_zero_facing_keeps_previous_direction() {
        let mut anim = CompassAnimator::new(sheet("idle", 1)).with_facing(FacingVector::new(1, 1));
        anim.set_direction_source(FacingVector::NONE);
        anim.tick(0.01, None);
        assert_eq!(anim.facing(), CompassDirection::NorthEast);
        assert_eq!(anim.state.direction, CompassDirection::NorthEast);
    }

    #[test]
    fn test_viewer_side_rotates_displayed_direction() {
        let mut anim = CompassAnimator::new(sheet("idle", 1)).with_facing(FacingVector::new(1, 0));
        anim.tick(0.01, Some(CompassDirection::East));
        assert_eq!(anim.facing(), CompassDirection::East);
        assert_eq!(anim.state.direction, CompassDirection::South);
    }

    #[test]
    fn test_rebuild_table_error_keeps_old_table() {
        let mut anim = CompassAnimator::new(sheet("walk", 2));
        let err = anim.rebuild_table(frames(7), SheetLayout::PvGames).unwrap_err();
        assert_eq!(err, CompassError::UnevenSheet { len: 7 });
        assert_eq!(anim.sheet().frames_per_direction(), 2);
    }

    #[test]
    fn test_rebuild_table_restarts_playback() {
        let mut anim = CompassAnimator::new(sheet("walk", 3));
        anim.tick(0.15, None);
        anim.tick(0.15, None);
        assert_eq!(anim.state.frame_index, 2);
        anim.rebuild_table(frames(8), SheetLayout::PvGames).unwrap();
        assert_eq!(anim.state.frame_index, 0);
        assert_eq!(anim.sheet().frames_per_direction(), 1);
        assert_eq!(anim.sheet().name, "walk");
    }

    #[test]
    fn test_switch_sheet_keeps_facing() {
        let mut anim = CompassAnimator::new(sheet("idle", 1)).with_facing(FacingVector::new(0, 1));
        anim.tick(0.0, None);
        anim.switch_sheet(sheet("attack", 4));
        assert_eq!(anim.sheet().name, "attack");
        assert_eq!(anim.state.frame_index, 0);
        assert_eq!(anim.state.direction, CompassDirection::North);
    }

    #[test]
    fn test_random_facing_sets_direction() {
        let anim = CompassAnimator::new(sheet("idle", 1)).with_random_facing();
        assert_eq!(anim.state.direction, anim.facing());
    }

    #[test]
    fn test_controller_state_keys() {
        let mut ctrl = CompassAnimController::new(["dead", "idle", "move", "attack"]).with_state(1);
        assert!(ctrl.is_pending());
        assert_eq!(ctrl.requested_key(), Some("idle"));
        ctrl.mark_active();
        assert!(!ctrl.is_pending());
        assert!(ctrl.set_state_key("attack"));
        assert_eq!(ctrl.state, 3);
        assert!(!ctrl.set_state_key("jump"));
        assert_eq!(ctrl.state, 3);
        assert!(ctrl.is_pending());
    }
}
