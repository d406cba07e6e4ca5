//! Gesture classification and dwell-based stabilization.

use serde::{Deserialize, Serialize};

use crate::landmark::{LandmarkFrame, keypoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureLabel {
    None,
    Fist,
    Point,
    Peace,
    Open,
    Unknown,
}

/// Coarse geometric classification of one frame.
///
/// A non-thumb finger counts as extended when its tip sits above its
/// PIP joint in camera space (y grows downward). The thumb is ignored
/// and only 2D coordinates are compared; this is deliberately kept
/// bit-for-bit with the shipped heuristic, camera-angle sensitivity
/// included. Tie-break order: fist, point, peace, open; any other
/// combination is `Unknown`.
pub fn classify(frame: &LandmarkFrame) -> GestureLabel {
    let p = &frame.points;
    let extended = |tip: usize, pip: usize| p[tip].y < p[pip].y;

    let index = extended(keypoint::INDEX_TIP, keypoint::INDEX_PIP);
    let middle = extended(keypoint::MIDDLE_TIP, keypoint::MIDDLE_PIP);
    let ring = extended(keypoint::RING_TIP, keypoint::RING_PIP);
    let pinky = extended(keypoint::PINKY_TIP, keypoint::PINKY_PIP);

    let count = [index, middle, ring, pinky].iter().filter(|&&b| b).count();
    match count {
        0 => GestureLabel::Fist,
        1 if index => GestureLabel::Point,
        2 if index && middle => GestureLabel::Peace,
        n if n >= 3 => GestureLabel::Open,
        _ => GestureLabel::Unknown,
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    label: GestureLabel,
    since_ms: u64,
}

/// Requires a candidate label to persist for the dwell before it is
/// published, so single-frame misclassifications never reach the
/// stroke machine.
#[derive(Debug)]
pub struct GestureStabilizer {
    dwell_ms: u64,
    candidate: Option<Candidate>,
    published: GestureLabel,
}

impl GestureStabilizer {
    pub fn new(dwell_ms: u64) -> Self {
        Self {
            dwell_ms,
            candidate: None,
            published: GestureLabel::None,
        }
    }

    pub fn published(&self) -> GestureLabel {
        self.published
    }

    /// Feed one classification. Returns `Some(label)` only when the
    /// published gesture changes.
    pub fn observe(&mut self, label: GestureLabel, now_ms: u64) -> Option<GestureLabel> {
        match self.candidate {
            Some(c) if c.label == label => {
                if now_ms.saturating_sub(c.since_ms) >= self.dwell_ms && self.published != label {
                    self.published = label;
                    return Some(label);
                }
            }
            _ => {
                self.candidate = Some(Candidate {
                    label,
                    since_ms: now_ms,
                });
            }
        }
        None
    }

    /// Re-arm on hand loss: a reappearing hand must not inherit stale
    /// dwell progress. Returns `Some` if the published label changed.
    pub fn reset(&mut self) -> Option<GestureLabel> {
        self.candidate = None;
        if self.published != GestureLabel::None {
            self.published = GestureLabel::None;
            Some(GestureLabel::None)
        } else {
            None
        }
    }
}
