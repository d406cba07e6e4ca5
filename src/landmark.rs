//! Hand landmark frames as delivered by the external detector.
//!
//! Coordinates follow the MediaPipe hand landmark convention: 21 points
//! per hand, x/y normalized to [0,1] over the camera image (y grows
//! downward), z is depth relative to the wrist.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LANDMARK_COUNT: usize = 21;

/// Keypoint indices (MediaPipe hand landmark model convention).
pub mod keypoint {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

/// One detector output cycle for a single hand, immutable once built.
#[derive(Debug, Clone)]
pub struct LandmarkFrame {
    pub points: [Keypoint; LANDMARK_COUNT],
    pub timestamp_ms: u64,
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("expected {LANDMARK_COUNT} keypoints, got {0}")]
    KeypointCount(usize),
}

impl LandmarkFrame {
    pub fn from_points(points: Vec<Keypoint>, timestamp_ms: u64) -> Result<Self, FrameError> {
        let points: [Keypoint; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|v: Vec<Keypoint>| FrameError::KeypointCount(v.len()))?;
        Ok(Self {
            points,
            timestamp_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exactly_21_points() {
        let frame = LandmarkFrame::from_points(vec![Keypoint::default(); 21], 5).unwrap();
        assert_eq!(frame.timestamp_ms, 5);
        assert_eq!(frame.points.len(), LANDMARK_COUNT);
    }

    #[test]
    fn rejects_wrong_count() {
        let err = LandmarkFrame::from_points(vec![Keypoint::default(); 5], 0).unwrap_err();
        assert!(matches!(err, FrameError::KeypointCount(5)));
    }
}
