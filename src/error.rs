//! Error type shared by sheet building and configuration loading.

use thiserror::Error;

/// Errors raised while building sprite tables or loading configuration.
///
/// All of these surface at initialization time. Per-frame operations are
/// total and never fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompassError {
    #[error("sprite sheet is empty, expected a multiple of 8 frames")]
    EmptySheet,
    #[error("sprite sheet has {len} frames, which is not a multiple of 8 (one block per compass direction)")]
    UnevenSheet { len: usize },
    #[error("unknown sheet layout '{0}', expected 'canonical' or 'pvgames'")]
    UnknownLayout(String),
    #[error("frame duration must be a positive number of seconds, got {0}")]
    InvalidFrameDuration(f32),
    #[error("invalid dead zone: inner {inner} must be positive and not above outer {outer}")]
    InvalidDeadZone { inner: f32, outer: f32 },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("failed to parse sheet manifest: {0}")]
    Manifest(String),
}

impl From<serde_json::Error> for CompassError {
    fn from(err: serde_json::Error) -> Self {
        CompassError::Manifest(err.to_string())
    }
}
