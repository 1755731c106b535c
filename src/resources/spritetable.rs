//! Frame × direction sprite tables.
//!
//! A [`SpriteTable`] is a flat list addressed by `frame * 8 + direction`, with
//! directions in [`CompassDirection`] index order. Sheets exported by art
//! tools in a different block order are converted once, when the table is
//! built, according to their [`SheetLayout`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::components::compass::CompassDirection;
use crate::error::CompassError;

/// Number of directions per animation frame.
pub const DIRECTIONS: usize = 8;

/// Block order of the 8 directions in a PVGames export.
const PVGAMES_SOURCE_ORDER: [CompassDirection; DIRECTIONS] = [
    CompassDirection::South,
    CompassDirection::West,
    CompassDirection::East,
    CompassDirection::North,
    CompassDirection::SouthEast,
    CompassDirection::NorthEast,
    CompassDirection::SouthWest,
    CompassDirection::NorthWest,
];

/// How the frames of an incoming flat sprite array are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetLayout {
    /// Already interleaved as `frame * 8 + direction`.
    #[default]
    Canonical,
    /// 8 contiguous blocks of `len / 8` frames, ordered S, W, E, N, SE, NE, SW, NW.
    PvGames,
}

impl SheetLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            SheetLayout::Canonical => "canonical",
            SheetLayout::PvGames => "pvgames",
        }
    }
}

impl FromStr for SheetLayout {
    type Err = CompassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canonical" | "compass" => Ok(SheetLayout::Canonical),
            "pvgames" => Ok(SheetLayout::PvGames),
            other => Err(CompassError::UnknownLayout(other.to_string())),
        }
    }
}

/// Sprite handles laid out as `frame * 8 + direction`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteTable<T> {
    frames: Vec<T>,
}

impl<T> SpriteTable<T> {
    /// Build a table from a flat sprite array arranged per `layout`.
    ///
    /// Fails when the array is empty or its length is not a multiple of 8.
    pub fn from_layout(flat: Vec<T>, layout: SheetLayout) -> Result<Self, CompassError> {
        check_len(flat.len())?;
        let frames = match layout {
            SheetLayout::Canonical => flat,
            SheetLayout::PvGames => interleave_blocks(flat),
        };
        Ok(SpriteTable { frames })
    }

    /// Number of animation frames, i.e. rows of 8 sprites.
    pub fn frames_per_direction(&self) -> usize {
        self.frames.len() / DIRECTIONS
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, frame: usize, direction: CompassDirection) -> Option<&T> {
        if frame >= self.frames_per_direction() {
            return None;
        }
        self.frames.get(frame * DIRECTIONS + direction.index())
    }

    /// Flat view in table order.
    pub fn as_slice(&self) -> &[T] {
        &self.frames
    }
}

fn check_len(len: usize) -> Result<(), CompassError> {
    if len == 0 {
        return Err(CompassError::EmptySheet);
    }
    if len % DIRECTIONS != 0 {
        return Err(CompassError::UnevenSheet { len });
    }
    Ok(())
}

/// Split into 8 source blocks and deal them out round-robin into canonical rows.
fn interleave_blocks<T>(flat: Vec<T>) -> Vec<T> {
    let per_block = flat.len() / DIRECTIONS;
    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(flat.len()).collect();
    for (i, sprite) in flat.into_iter().enumerate() {
        let direction = PVGAMES_SOURCE_ORDER[i / per_block];
        let frame = i % per_block;
        slots[frame * DIRECTIONS + direction.index()] = Some(sprite);
    }
    // every slot is written exactly once: the source mapping is a bijection
    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(frame: usize, dir: CompassDirection) -> String {
        format!("f{}-{}", frame, dir.short_name())
    }

    /// Flat PVGames export: block per direction in source order, frames inside.
    fn pvgames_sheet(frames: usize) -> Vec<String> {
        PVGAMES_SOURCE_ORDER
            .iter()
            .flat_map(|dir| (0..frames).map(move |f| marker(f, *dir)))
            .collect()
    }

    #[test]
    fn test_pvgames_reorder_two_frames() {
        let table = SpriteTable::from_layout(pvgames_sheet(2), SheetLayout::PvGames).unwrap();
        assert_eq!(table.len(), 16);
        assert_eq!(table.frames_per_direction(), 2);
        for frame in 0..2 {
            for dir in CompassDirection::ALL {
                assert_eq!(table.as_slice()[frame * 8 + dir.index()], marker(frame, dir));
                assert_eq!(table.get(frame, dir), Some(&marker(frame, dir)));
            }
        }
    }

    #[test]
    fn test_pvgames_first_row_is_canonical_order() {
        let table = SpriteTable::from_layout(pvgames_sheet(3), SheetLayout::PvGames).unwrap();
        let row: Vec<&str> = table.as_slice()[..8].iter().map(|s| s.as_str()).collect();
        assert_eq!(
            row,
            vec!["f0-S", "f0-SE", "f0-E", "f0-NE", "f0-N", "f0-NW", "f0-W", "f0-SW"]
        );
    }

    #[test]
    fn test_canonical_layout_is_kept() {
        let flat: Vec<usize> = (0..24).collect();
        let table = SpriteTable::from_layout(flat.clone(), SheetLayout::Canonical).unwrap();
        assert_eq!(table.as_slice(), flat.as_slice());
        assert_eq!(table.get(2, CompassDirection::SouthWest), Some(&23));
        assert_eq!(table.get(3, CompassDirection::South), None);
    }

    #[test]
    fn test_length_seven_is_rejected() {
        let err = SpriteTable::from_layout(vec![0u8; 7], SheetLayout::PvGames).unwrap_err();
        assert_eq!(err, CompassError::UnevenSheet { len: 7 });
        assert!(err.to_string().contains("not a multiple of 8"));
    }

    #[test]
    fn test_empty_is_rejected() {
        let err = SpriteTable::<u8>::from_layout(Vec::new(), SheetLayout::Canonical).unwrap_err();
        assert_eq!(err, CompassError::EmptySheet);
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!("PVGames".parse::<SheetLayout>(), Ok(SheetLayout::PvGames));
        assert_eq!(" canonical ".parse::<SheetLayout>(), Ok(SheetLayout::Canonical));
        assert!(matches!(
            "diagonal".parse::<SheetLayout>(),
            Err(CompassError::UnknownLayout(_))
        ));
    }
}
