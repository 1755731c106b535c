use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::resources::compasssheetstore::SpriteFrame;

/// Sprite is identified by a texture key, its size in world units and an offset into the texture.
/// The offset selects the frame when the texture is a spritesheet.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct Sprite {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub offset: Vec2,
}

impl Sprite {
    /// Point this sprite at `frame`, reusing the key allocation when the texture is unchanged.
    pub fn show(&mut self, frame: &SpriteFrame) {
        if self.tex_key.as_str() != &*frame.tex_key {
            self.tex_key = frame.tex_key.to_string();
        }
        self.width = frame.width;
        self.height = frame.height;
        self.offset = frame.offset;
    }
}
