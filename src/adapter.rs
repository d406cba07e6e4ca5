//! Landmark frame intake: min-tick throttling and malformed-frame drops.

use crate::landmark::{Keypoint, LandmarkFrame};

#[derive(Debug, Clone)]
pub enum Ingest {
    /// Frame passed the gate and goes down the pipeline unchanged.
    Accepted(LandmarkFrame),
    /// Empty landmark set: the detector saw no hand. Never throttled,
    /// since hand loss must force the stroke machine to Idle promptly.
    NoHand,
    /// Dropped (too fast or malformed); counted, never an error.
    Skipped,
}

#[derive(Debug)]
pub struct FrameAdapter {
    min_tick_ms: u64,
    last_accept_ms: Option<u64>,
    pub dropped_fast: u64,
    pub dropped_malformed: u64,
}

impl FrameAdapter {
    pub fn new(min_tick_ms: u64) -> Self {
        Self {
            min_tick_ms,
            last_accept_ms: None,
            dropped_fast: 0,
            dropped_malformed: 0,
        }
    }

    pub fn ingest(&mut self, landmarks: Vec<Keypoint>, timestamp_ms: u64, now_ms: u64) -> Ingest {
        if landmarks.is_empty() {
            return Ingest::NoHand;
        }
        let frame = match LandmarkFrame::from_points(landmarks, timestamp_ms) {
            Ok(f) => f,
            Err(_) => {
                self.dropped_malformed += 1;
                return Ingest::Skipped;
            }
        };
        if let Some(last) = self.last_accept_ms {
            if now_ms.saturating_sub(last) < self.min_tick_ms {
                self.dropped_fast += 1;
                return Ingest::Skipped;
            }
        }
        self.last_accept_ms = Some(now_ms);
        Ingest::Accepted(frame)
    }
}
