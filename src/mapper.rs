//! Normalized camera space to drawing-surface and screen coordinates.
//!
//! The camera preview shown to the user may be mirrored, but drawing
//! coordinates are not: normalized x maps left-to-right straight onto
//! the surface. No smoothing is applied; every accepted frame yields a
//! fresh point.

use crate::landmark::{LandmarkFrame, keypoint};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for SurfaceRect {
    fn default() -> Self {
        // camera processing resolution until the host reports its layout
        Self {
            left: 0.0,
            top: 0.0,
            width: 640.0,
            height: 480.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorPoint {
    pub drawing_x: f32,
    pub drawing_y: f32,
    pub screen_x: f32,
    pub screen_y: f32,
}

/// Project the index fingertip into surface pixels plus absolute screen
/// coordinates for the cursor indicator.
pub fn map_index_tip(frame: &LandmarkFrame, rect: &SurfaceRect) -> CursorPoint {
    let tip = frame.points[keypoint::INDEX_TIP];
    let drawing_x = tip.x * rect.width;
    let drawing_y = tip.y * rect.height;
    CursorPoint {
        drawing_x,
        drawing_y,
        screen_x: rect.left + drawing_x,
        screen_y: rect.top + drawing_y,
    }
}

/// Bone segments for the skeleton overlay, as keypoint index pairs.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (keypoint::WRIST, keypoint::THUMB_CMC),
    (keypoint::THUMB_CMC, keypoint::THUMB_MCP),
    (keypoint::THUMB_MCP, keypoint::THUMB_IP),
    (keypoint::THUMB_IP, keypoint::THUMB_TIP),
    (keypoint::WRIST, keypoint::INDEX_MCP),
    (keypoint::INDEX_MCP, keypoint::INDEX_PIP),
    (keypoint::INDEX_PIP, keypoint::INDEX_DIP),
    (keypoint::INDEX_DIP, keypoint::INDEX_TIP),
    (keypoint::WRIST, keypoint::MIDDLE_MCP),
    (keypoint::MIDDLE_MCP, keypoint::MIDDLE_PIP),
    (keypoint::MIDDLE_PIP, keypoint::MIDDLE_DIP),
    (keypoint::MIDDLE_DIP, keypoint::MIDDLE_TIP),
    (keypoint::WRIST, keypoint::RING_MCP),
    (keypoint::RING_MCP, keypoint::RING_PIP),
    (keypoint::RING_PIP, keypoint::RING_DIP),
    (keypoint::RING_DIP, keypoint::RING_TIP),
    (keypoint::WRIST, keypoint::PINKY_MCP),
    (keypoint::PINKY_MCP, keypoint::PINKY_PIP),
    (keypoint::PINKY_PIP, keypoint::PINKY_DIP),
    (keypoint::PINKY_DIP, keypoint::PINKY_TIP),
    (keypoint::INDEX_MCP, keypoint::MIDDLE_MCP),
];

/// Project all 21 keypoints into surface pixels for the overlay draw.
pub fn project_skeleton(frame: &LandmarkFrame, rect: &SurfaceRect) -> Vec<(f32, f32)> {
    frame
        .points
        .iter()
        .map(|p| (p.x * rect.width, p.y * rect.height))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Keypoint, LANDMARK_COUNT};

    fn frame_with_tip(x: f32, y: f32) -> LandmarkFrame {
        let mut points = [Keypoint::default(); LANDMARK_COUNT];
        points[keypoint::INDEX_TIP] = Keypoint { x, y, z: 0.0 };
        LandmarkFrame {
            points,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn maps_without_mirroring() {
        let rect = SurfaceRect {
            left: 100.0,
            top: 50.0,
            width: 800.0,
            height: 600.0,
        };
        let p = map_index_tip(&frame_with_tip(0.25, 0.5), &rect);
        assert_eq!(p.drawing_x, 200.0);
        assert_eq!(p.drawing_y, 300.0);
        assert_eq!(p.screen_x, 300.0);
        assert_eq!(p.screen_y, 350.0);
    }

    #[test]
    fn skeleton_projection_covers_all_points() {
        let rect = SurfaceRect::default();
        let pts = project_skeleton(&frame_with_tip(1.0, 1.0), &rect);
        assert_eq!(pts.len(), LANDMARK_COUNT);
        assert_eq!(pts[keypoint::INDEX_TIP], (640.0, 480.0));
    }
}
