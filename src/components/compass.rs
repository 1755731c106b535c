//! Compass directions, facing vectors and the two quantizers.
//!
//! Directions are indexed `S, SE, E, NE, N, NW, W, SW` (0..=7). With +x as
//! East and +y as North, increasing the index turns counter-clockwise. Every
//! table in the crate uses this order; sprite sheets authored in another
//! order are converted once by [`SpriteTable`](crate::resources::spritetable::SpriteTable).
//!
//! Two ways lead to a direction:
//! - [`bucketize`] maps a compass angle (0° = South, 90° = East) to one of
//!   8 sectors of 45°.
//! - [`FacingVector::quantize`] rounds each axis of a direction vector to
//!   {-1, 0, 1} through a [`DeadZone`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::CompassError;

/// Width of one compass sector in degrees.
pub const SECTOR_DEGREES: f32 = 45.0;
/// Half sector; sector boundaries sit at odd multiples of this value.
pub const HALF_SECTOR_DEGREES: f32 = 22.5;

/// One of the 8 discrete facing buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompassDirection {
    #[default]
    South = 0,
    SouthEast = 1,
    East = 2,
    NorthEast = 3,
    North = 4,
    NorthWest = 5,
    West = 6,
    SouthWest = 7,
}

impl CompassDirection {
    /// All directions in index order.
    pub const ALL: [CompassDirection; 8] = [
        CompassDirection::South,
        CompassDirection::SouthEast,
        CompassDirection::East,
        CompassDirection::NorthEast,
        CompassDirection::North,
        CompassDirection::NorthWest,
        CompassDirection::West,
        CompassDirection::SouthWest,
    ];

    /// Index into a sprite table row, in `0..8`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Direction for a quantized facing vector. `(0, 0)` has none.
    pub fn from_facing(facing: FacingVector) -> Option<Self> {
        match (facing.x, facing.y) {
            (0, -1) => Some(CompassDirection::South),
            (1, -1) => Some(CompassDirection::SouthEast),
            (1, 0) => Some(CompassDirection::East),
            (1, 1) => Some(CompassDirection::NorthEast),
            (0, 1) => Some(CompassDirection::North),
            (-1, 1) => Some(CompassDirection::NorthWest),
            (-1, 0) => Some(CompassDirection::West),
            (-1, -1) => Some(CompassDirection::SouthWest),
            _ => None,
        }
    }

    /// Unit-step facing vector pointing this way.
    pub fn facing(self) -> FacingVector {
        match self {
            CompassDirection::South => FacingVector::new(0, -1),
            CompassDirection::SouthEast => FacingVector::new(1, -1),
            CompassDirection::East => FacingVector::new(1, 0),
            CompassDirection::NorthEast => FacingVector::new(1, 1),
            CompassDirection::North => FacingVector::new(0, 1),
            CompassDirection::NorthWest => FacingVector::new(-1, 1),
            CompassDirection::West => FacingVector::new(-1, 0),
            CompassDirection::SouthWest => FacingVector::new(-1, -1),
        }
    }

    /// Rotate by `steps` sectors, counter-clockwise for positive values.
    pub fn rotated(self, steps: i32) -> Self {
        let index = (self.index() as i32 + steps).rem_euclid(8) as usize;
        Self::ALL[index]
    }

    /// Which side of an entity facing `self` is visible from `viewer_side`.
    ///
    /// `viewer_side` is the direction from the entity toward the viewer. A
    /// viewer standing South sees the facing unchanged.
    pub fn relative_to(self, viewer_side: CompassDirection) -> Self {
        self.rotated(-(viewer_side.index() as i32))
    }

    pub fn short_name(self) -> &'static str {
        match self {
            CompassDirection::South => "S",
            CompassDirection::SouthEast => "SE",
            CompassDirection::East => "E",
            CompassDirection::NorthEast => "NE",
            CompassDirection::North => "N",
            CompassDirection::NorthWest => "NW",
            CompassDirection::West => "W",
            CompassDirection::SouthWest => "SW",
        }
    }
}

/// Map a compass angle in degrees to its 45° sector.
///
/// Sectors are half-open `[lo, hi)` with boundaries at odd multiples of 22.5°;
/// `[337.5, 360) ∪ [0, 22.5)` is South. Any finite angle is accepted and
/// wrapped into `[0, 360)`. Non-finite angles map to South.
pub fn bucketize(degrees: f32) -> CompassDirection {
    if !degrees.is_finite() {
        return CompassDirection::South;
    }
    let normalized = f64::from(degrees.rem_euclid(360.0));
    // f32 addition would round values just below a boundary onto it.
    // rem_euclid can round up to exactly 360.0, the `% 8` folds it back to South
    let sector = ((normalized + f64::from(HALF_SECTOR_DEGREES)) / f64::from(SECTOR_DEGREES))
        .floor() as usize
        % 8;
    CompassDirection::ALL[sector]
}

/// Compass angle of a planar vector: 0° South, 90° East, 180° North, 270° West.
pub fn heading_degrees(v: Vec2) -> f32 {
    (v.y.atan2(v.x).to_degrees() + 90.0).rem_euclid(360.0)
}

/// Axis thresholds for [`quantize_axis`].
///
/// Values strictly inside `(-inner, inner)` are 0, values at or beyond
/// `±outer` are `±1`. The band between the two also rounds to 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeadZone {
    pub inner: f32,
    pub outer: f32,
}

impl Default for DeadZone {
    fn default() -> Self {
        DeadZone {
            inner: 0.45,
            outer: 0.46,
        }
    }
}

impl DeadZone {
    pub fn new(inner: f32, outer: f32) -> Result<Self, CompassError> {
        if !(inner.is_finite() && outer.is_finite()) || inner <= 0.0 || inner > outer {
            return Err(CompassError::InvalidDeadZone { inner, outer });
        }
        Ok(DeadZone { inner, outer })
    }
}

/// Round one normalized axis component to -1, 0 or 1.
pub fn quantize_axis(value: f32, dead_zone: DeadZone) -> i8 {
    if value > -dead_zone.inner && value < dead_zone.inner {
        0
    } else if value >= dead_zone.outer {
        1
    } else if value <= -dead_zone.outer {
        -1
    } else {
        0
    }
}

/// Quantized facing with both components in {-1, 0, 1}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FacingVector {
    pub x: i8,
    pub y: i8,
}

impl FacingVector {
    /// The "no direction" facing.
    pub const NONE: FacingVector = FacingVector { x: 0, y: 0 };

    /// Build from arbitrary integers, keeping only their signs.
    pub fn new(x: i8, y: i8) -> Self {
        FacingVector {
            x: x.signum(),
            y: y.signum(),
        }
    }

    /// Quantize a planar direction. The vector is normalized first; zero or
    /// non-finite input yields [`FacingVector::NONE`].
    pub fn quantize(direction: Vec2, dead_zone: DeadZone) -> Self {
        let n = direction.normalize_or_zero();
        FacingVector {
            x: quantize_axis(n.x, dead_zone),
            y: quantize_axis(n.y, dead_zone),
        }
    }

    /// Quantize a 3D direction on its ground plane: `x` is East, `z` North.
    pub fn quantize_ground(x: f32, z: f32, dead_zone: DeadZone) -> Self {
        Self::quantize(Vec2::new(x, z), dead_zone)
    }

    /// One of the 8 valid facings, chosen at random.
    pub fn random() -> Self {
        CompassDirection::ALL[fastrand::usize(..CompassDirection::ALL.len())].facing()
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn direction(self) -> Option<CompassDirection> {
        CompassDirection::from_facing(self)
    }
}

impl From<CompassDirection> for FacingVector {
    fn from(direction: CompassDirection) -> Self {
        direction.facing()
    }
}
