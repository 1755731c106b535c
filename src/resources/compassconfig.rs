//! Compass animation configuration resource.
//!
//! Settings are read from an INI file. Missing keys keep their defaults;
//! present but invalid values are rejected so a bad file never produces a
//! half-applied configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [animation]
//! frame_duration = 0.15
//! time_scale = 1.0
//!
//! [facing]
//! dead_zone_inner = 0.45
//! dead_zone_outer = 0.46
//!
//! [sheet]
//! layout = pvgames
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;

use crate::components::compass::DeadZone;
use crate::error::CompassError;
use crate::resources::compasssheetstore::validate_frame_duration;
use crate::resources::spritetable::SheetLayout;

const DEFAULT_FRAME_DURATION: f32 = 0.15;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./compass.ini";

/// Compass animation configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CompassConfig {
    /// Seconds per frame for sheets that do not set their own.
    pub frame_duration: f32,
    /// Multiplier applied to every frame delta.
    pub time_scale: f32,
    /// Thresholds used when quantizing facing vectors.
    pub dead_zone: DeadZone,
    /// Layout assumed for sheets that do not set their own.
    pub layout: SheetLayout,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CompassConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            frame_duration: DEFAULT_FRAME_DURATION,
            time_scale: DEFAULT_TIME_SCALE,
            dead_zone: DeadZone::default(),
            layout: SheetLayout::Canonical,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file at `config_path`.
    pub fn load_from_file(&mut self) -> Result<(), CompassError> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|e| CompassError::Config(format!("failed to load config file: {}", e)))?;
        self.apply(&ini)?;
        info!(
            "Loaded compass config from {:?}: frame_duration={}, time_scale={}, dead_zone={}/{}, layout={}",
            self.config_path,
            self.frame_duration,
            self.time_scale,
            self.dead_zone.inner,
            self.dead_zone.outer,
            self.layout.as_str()
        );
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), CompassError> {
        let mut ini = Ini::new();
        ini.read(text.to_string())
            .map_err(|e| CompassError::Config(format!("failed to parse config: {}", e)))?;
        self.apply(&ini)
    }

    fn apply(&mut self, ini: &Ini) -> Result<(), CompassError> {
        let frame_duration = match float(ini, "animation", "frame_duration")? {
            Some(v) => validate_frame_duration(v)?,
            None => self.frame_duration,
        };
        let time_scale = match float(ini, "animation", "time_scale")? {
            Some(v) if v.is_finite() && v >= 0.0 => v,
            Some(v) => {
                return Err(CompassError::Config(format!(
                    "time_scale must be a non-negative number, got {}",
                    v
                )));
            }
            None => self.time_scale,
        };
        let inner = float(ini, "facing", "dead_zone_inner")?.unwrap_or(self.dead_zone.inner);
        let outer = float(ini, "facing", "dead_zone_outer")?.unwrap_or(self.dead_zone.outer);
        let dead_zone = DeadZone::new(inner, outer)?;
        let layout = match ini.get("sheet", "layout") {
            Some(name) => name.parse()?,
            None => self.layout,
        };

        self.frame_duration = frame_duration;
        self.time_scale = time_scale;
        self.dead_zone = dead_zone;
        self.layout = layout;
        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), CompassError> {
        let mut ini = Ini::new();

        ini.set("animation", "frame_duration", Some(self.frame_duration.to_string()));
        ini.set("animation", "time_scale", Some(self.time_scale.to_string()));
        ini.set("facing", "dead_zone_inner", Some(self.dead_zone.inner.to_string()));
        ini.set("facing", "dead_zone_outer", Some(self.dead_zone.outer.to_string()));
        ini.set("sheet", "layout", Some(self.layout.as_str().to_string()));

        ini.write(&self.config_path)
            .map_err(|e| CompassError::Config(format!("failed to save config file: {}", e)))?;

        info!("Saved compass config to {:?}", self.config_path);
        Ok(())
    }
}

fn float(ini: &Ini, section: &str, key: &str) -> Result<Option<f32>, CompassError> {
    ini.getfloat(section, key)
        .map(|v| v.map(|f| f as f32))
        .map_err(|e| CompassError::Config(format!("[{}] {}: {}", section, key, e)))
}
