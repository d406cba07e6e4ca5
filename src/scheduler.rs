//! Overlay render scheduling: coalescing delayed draws, deferred clear.
//!
//! The stroke channel needs no scheduler of its own — dot/segment
//! renders are emitted synchronously per accepted frame and are already
//! rate-bounded by the adapter tick. The skeleton overlay is the
//! expensive draw, so it runs on a delayed, coalescing schedule:
//! deadlines are explicit `due_ms` values fired from `poll`, never
//! ambient timeouts.

use crate::landmark::LandmarkFrame;

#[derive(Debug)]
pub enum OverlayAction {
    Draw(LandmarkFrame),
    Clear,
}

#[derive(Debug)]
struct Pending {
    due_ms: u64,
    frame: LandmarkFrame,
}

#[derive(Debug)]
pub struct OverlayScheduler {
    delay_ms: u64,
    clear_after_ms: u64,
    pending: Option<Pending>,
    last_drawn_ms: Option<u64>,
    clear_requested: bool,
    pub coalesced: u64,
}

impl OverlayScheduler {
    pub fn new(delay_ms: u64, clear_after_ms: u64) -> Self {
        Self {
            delay_ms,
            clear_after_ms,
            pending: None,
            last_drawn_ms: None,
            clear_requested: false,
            coalesced: 0,
        }
    }

    /// Request a skeleton draw for `frame`. While a job is pending the
    /// new frame supersedes the queued one without extending the
    /// deadline, so at most one render fires per cycle and it carries
    /// the most recent data.
    pub fn request(&mut self, frame: LandmarkFrame, now_ms: u64) {
        self.clear_requested = false;
        match self.pending.as_mut() {
            Some(p) => {
                p.frame = frame;
                self.coalesced += 1;
            }
            None => {
                self.pending = Some(Pending {
                    due_ms: now_ms + self.delay_ms,
                    frame,
                });
            }
        }
    }

    /// Request the overlay be wiped. Cancels any pending draw; the
    /// clear itself is deferred until the overlay has been untouched
    /// for the clear interval, avoiding clear/redraw flicker.
    pub fn request_clear(&mut self) {
        self.pending = None;
        self.clear_requested = true;
    }

    pub fn poll(&mut self, now_ms: u64) -> Option<OverlayAction> {
        if self.pending.as_ref().is_some_and(|p| now_ms >= p.due_ms) {
            if let Some(p) = self.pending.take() {
                self.last_drawn_ms = Some(now_ms);
                return Some(OverlayAction::Draw(p.frame));
            }
        }
        if self.clear_requested {
            let untouched = self
                .last_drawn_ms
                .is_none_or(|t| now_ms.saturating_sub(t) >= self.clear_after_ms);
            if untouched {
                self.clear_requested = false;
                return Some(OverlayAction::Clear);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Keypoint, LANDMARK_COUNT};

    fn frame(ts: u64) -> LandmarkFrame {
        LandmarkFrame {
            points: [Keypoint::default(); LANDMARK_COUNT],
            timestamp_ms: ts,
        }
    }

    #[test]
    fn draw_fires_after_the_delay() {
        let mut sched = OverlayScheduler::new(100, 100);
        sched.request(frame(1), 0);
        assert!(sched.poll(50).is_none());
        assert!(matches!(sched.poll(100), Some(OverlayAction::Draw(_))));
        assert!(sched.poll(101).is_none());
    }

    #[test]
    fn pending_requests_coalesce_to_the_newest_frame() {
        let mut sched = OverlayScheduler::new(100, 100);
        sched.request(frame(1), 0);
        sched.request(frame(2), 30);
        sched.request(frame(3), 60);
        assert_eq!(sched.coalesced, 2);
        // deadline unchanged by the later requests
        assert!(sched.poll(99).is_none());
        match sched.poll(100) {
            Some(OverlayAction::Draw(f)) => assert_eq!(f.timestamp_ms, 3),
            other => panic!("expected draw, got {other:?}"),
        }
        // the cycle is over; a new request schedules again
        sched.request(frame(4), 120);
        assert!(matches!(sched.poll(220), Some(OverlayAction::Draw(_))));
    }

    #[test]
    fn clear_waits_for_the_untouched_interval() {
        let mut sched = OverlayScheduler::new(100, 100);
        sched.request(frame(1), 0);
        assert!(matches!(sched.poll(100), Some(OverlayAction::Draw(_))));
        sched.request_clear();
        assert!(sched.poll(150).is_none());
        assert!(matches!(sched.poll(200), Some(OverlayAction::Clear)));
        assert!(sched.poll(201).is_none());
    }

    #[test]
    fn clear_cancels_a_pending_draw() {
        let mut sched = OverlayScheduler::new(100, 100);
        sched.request(frame(1), 0);
        sched.request_clear();
        // never drew, so the clear may fire immediately
        assert!(matches!(sched.poll(10), Some(OverlayAction::Clear)));
        assert!(sched.poll(200).is_none());
    }

    #[test]
    fn new_request_cancels_a_pending_clear() {
        let mut sched = OverlayScheduler::new(100, 100);
        sched.request_clear();
        sched.request(frame(1), 0);
        assert!(matches!(sched.poll(100), Some(OverlayAction::Draw(_))));
        assert!(sched.poll(300).is_none());
    }
}
