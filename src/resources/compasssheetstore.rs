//! Compass sheet registry.
//!
//! Sheets are built once, when their manifest is loaded, and shared between
//! animators through an [`Arc`]. Systems look them up by name, the same way
//! an [`AnimationController`](crate::components::compassanimator::CompassAnimController)
//! switches between its states.
//!
//! # Manifest format
//!
//! ```json
//! [
//!   {
//!     "name": "knight_idle",
//!     "texture_key": "knight",
//!     "frame_width": 32.0,
//!     "frame_height": 48.0,
//!     "frames_per_direction": 4,
//!     "layout": "pvgames",
//!     "frame_duration": 0.15
//!   }
//! ]
//! ```
//!
//! Frames are read left to right from a horizontal strip starting at
//! `(origin_x, origin_y)`, in the order given by `layout`. Missing `layout`
//! and `frame_duration` come from the [`CompassConfig`].

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::CompassError;
use crate::resources::compassconfig::CompassConfig;
use crate::resources::spritetable::{DIRECTIONS, SheetLayout, SpriteTable};

/// Opaque handle to one drawable frame: a texture and the rectangle inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFrame {
    pub tex_key: Arc<str>,
    pub offset: Vec2,
    pub width: f32,
    pub height: f32,
}

/// A named sprite table with its playback speed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompassSheet {
    pub name: String,
    pub table: Arc<SpriteTable<SpriteFrame>>,
    /// Seconds each frame stays on screen.
    pub frame_duration: f32,
}

impl CompassSheet {
    /// Build a sheet from a flat frame array. Fails fast on a malformed array
    /// or a non-positive frame duration.
    pub fn new(
        name: impl Into<String>,
        flat: Vec<SpriteFrame>,
        layout: SheetLayout,
        frame_duration: f32,
    ) -> Result<Self, CompassError> {
        let frame_duration = validate_frame_duration(frame_duration)?;
        let table = SpriteTable::from_layout(flat, layout)?;
        Ok(CompassSheet {
            name: name.into(),
            table: Arc::new(table),
            frame_duration,
        })
    }

    /// Build a sheet from a manifest entry. Frame duration and layout fall
    /// back to `defaults` when the manifest does not set them.
    pub fn from_manifest(
        manifest: &SheetManifest,
        defaults: &CompassConfig,
    ) -> Result<Self, CompassError> {
        let tex_key: Arc<str> = Arc::from(manifest.texture_key.as_str());
        let count = manifest.frames_per_direction * DIRECTIONS;
        let flat = (0..count)
            .map(|i| SpriteFrame {
                tex_key: tex_key.clone(),
                offset: Vec2::new(
                    manifest.origin_x + i as f32 * manifest.frame_width,
                    manifest.origin_y,
                ),
                width: manifest.frame_width,
                height: manifest.frame_height,
            })
            .collect();
        Self::new(
            manifest.name.clone(),
            flat,
            manifest.layout.unwrap_or(defaults.layout),
            manifest.frame_duration.unwrap_or(defaults.frame_duration),
        )
    }

    pub fn frames_per_direction(&self) -> usize {
        self.table.frames_per_direction()
    }
}

pub(crate) fn validate_frame_duration(seconds: f32) -> Result<f32, CompassError> {
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(CompassError::InvalidFrameDuration(seconds))
    }
}

/// One entry of a sheet manifest file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SheetManifest {
    pub name: String,
    pub texture_key: String,
    pub frame_width: f32,
    pub frame_height: f32,
    pub frames_per_direction: usize,
    #[serde(default)]
    pub layout: Option<SheetLayout>,
    #[serde(default)]
    pub frame_duration: Option<f32>,
    #[serde(default)]
    pub origin_x: f32,
    #[serde(default)]
    pub origin_y: f32,
}

/// Central registry of compass sheets keyed by name.
#[derive(Resource, Debug, Default)]
pub struct CompassSheetStore {
    pub sheets: FxHashMap<String, CompassSheet>,
}

impl CompassSheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sheet: CompassSheet) {
        self.sheets.insert(sheet.name.clone(), sheet);
    }

    pub fn get(&self, name: &str) -> Option<&CompassSheet> {
        self.sheets.get(name)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Parse a JSON manifest array and register every sheet in it.
    ///
    /// Nothing is inserted unless every entry is valid. Returns the number of
    /// sheets loaded.
    pub fn load_manifest_str(
        &mut self,
        json: &str,
        defaults: &CompassConfig,
    ) -> Result<usize, CompassError> {
        let manifests: Vec<SheetManifest> = serde_json::from_str(json)?;
        let sheets = manifests
            .iter()
            .map(|m| CompassSheet::from_manifest(m, defaults))
            .collect::<Result<Vec<_>, _>>()?;
        let count = sheets.len();
        for sheet in sheets {
            info!(
                "Loaded compass sheet '{}': {} frames per direction, {}s per frame",
                sheet.name,
                sheet.frames_per_direction(),
                sheet.frame_duration
            );
            self.insert(sheet);
        }
        Ok(count)
    }

    pub fn load_manifest_file(
        &mut self,
        path: impl AsRef<Path>,
        defaults: &CompassConfig,
    ) -> Result<usize, CompassError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CompassError::Manifest(format!("cannot read {}: {}", path.display(), e))
        })?;
        self.load_manifest_str(&json, defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::compass::CompassDirection;

    const MANIFEST: &str = r#"[
        {
            "name": "knight_walk",
            "texture_key": "knight",
            "frame_width": 32.0,
            "frame_height": 48.0,
            "frames_per_direction": 2,
            "layout": "pvgames",
            "frame_duration": 0.1
        },
        {
            "name": "knight_idle",
            "texture_key": "knight",
            "frame_width": 32.0,
            "frame_height": 48.0,
            "frames_per_direction": 1,
            "origin_y": 48.0
        }
    ]"#;

    #[test]
    fn test_load_manifest_registers_all_sheets() {
        let mut store = CompassSheetStore::new();
        let loaded = store.load_manifest_str(MANIFEST, &CompassConfig::new()).unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(store.len(), 2);

        let walk = store.get("knight_walk").unwrap();
        assert_eq!(walk.frames_per_direction(), 2);
        assert!((walk.frame_duration - 0.1).abs() < 1e-6);

        let idle = store.get("knight_idle").unwrap();
        assert!((idle.frame_duration - 0.15).abs() < 1e-6);
        let west = idle.table.get(0, CompassDirection::West).unwrap();
        assert_eq!(west.offset, Vec2::new(6.0 * 32.0, 48.0));
    }

    #[test]
    fn test_manifest_layout_defaults_to_config() {
        let json = r#"[{ "name": "s", "texture_key": "t", "frame_width": 1.0,
                         "frame_height": 1.0, "frames_per_direction": 1 }]"#;
        let mut config = CompassConfig::new();
        config.layout = SheetLayout::PvGames;
        let mut store = CompassSheetStore::new();
        store.load_manifest_str(json, &config).unwrap();
        // PVGames puts West in the second source block
        let west = store.get("s").unwrap().table.get(0, CompassDirection::West).unwrap();
        assert_eq!(west.offset.x, 1.0);
    }

    #[test]
    fn test_pvgames_manifest_offsets_follow_source_blocks() {
        let mut store = CompassSheetStore::new();
        store.load_manifest_str(MANIFEST, &CompassConfig::new()).unwrap();
        let walk = store.get("knight_walk").unwrap();
        // West is the second source block, two frames wide
        let west_f1 = walk.table.get(1, CompassDirection::West).unwrap();
        assert_eq!(west_f1.offset.x, 3.0 * 32.0);
        // NorthWest is the last block
        let nw_f0 = walk.table.get(0, CompassDirection::NorthWest).unwrap();
        assert_eq!(nw_f0.offset.x, 14.0 * 32.0);
    }

    #[test]
    fn test_invalid_manifest_inserts_nothing() {
        let json = r#"[
            { "name": "ok", "texture_key": "t", "frame_width": 8.0, "frame_height": 8.0,
              "frames_per_direction": 1 },
            { "name": "empty", "texture_key": "t", "frame_width": 8.0, "frame_height": 8.0,
              "frames_per_direction": 0 }
        ]"#;
        let mut store = CompassSheetStore::new();
        let err = store.load_manifest_str(json, &CompassConfig::new()).unwrap_err();
        assert_eq!(err, CompassError::EmptySheet);
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed_json_is_manifest_error() {
        let mut store = CompassSheetStore::new();
        let err = store.load_manifest_str("{ not json", &CompassConfig::new()).unwrap_err();
        assert!(matches!(err, CompassError::Manifest(_)));
    }

    #[test]
    fn test_non_positive_frame_duration_is_rejected() {
        let frame = SpriteFrame {
            tex_key: Arc::from("t"),
            offset: Vec2::ZERO,
            width: 1.0,
            height: 1.0,
        };
        let err = CompassSheet::new("s", vec![frame; 8], SheetLayout::Canonical, 0.0).unwrap_err();
        assert_eq!(err, CompassError::InvalidFrameDuration(0.0));
    }
}
