//! The assembled pipeline: adapter → classify → stabilize → map →
//! stroke, plus the overlay schedule and observable status.
//!
//! All state, including the skip counters and fps window, lives on this
//! struct; independent pipelines (tests run several) never interfere.
//! Every entry point takes `now_ms` from the caller, so time is fully
//! deterministic under test.

use log::{debug, warn};
use serde::Serialize;

use crate::adapter::{FrameAdapter, Ingest};
use crate::canvas::RenderSink;
use crate::config::Profile;
use crate::gesture::{GestureLabel, GestureStabilizer, classify};
use crate::landmark::Keypoint;
use crate::mapper::{SurfaceRect, map_index_tip, project_skeleton};
use crate::scheduler::{OverlayAction, OverlayScheduler};
use crate::stroke::{BrushSettings, StrokeEngine, Tool};

const FPS_WINDOW_MS: u64 = 1000;
const FPS_FLOOR: u32 = 15;
const WIDTH_RANGE: std::ops::RangeInclusive<u32> = 1..=50;

/// Read-only signals for external display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub hand_detected: bool,
    pub gesture: GestureLabel,
    pub fps: u32,
}

#[derive(Debug)]
struct FpsCounter {
    window_start_ms: u64,
    frames: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            window_start_ms: 0,
            frames: 0,
        }
    }

    fn on_frame(&mut self) {
        self.frames += 1;
    }

    fn tick(&mut self, now_ms: u64) -> Option<u32> {
        let elapsed = now_ms.saturating_sub(self.window_start_ms);
        if elapsed < FPS_WINDOW_MS {
            return None;
        }
        let fps = (u64::from(self.frames) * 1000 / elapsed) as u32;
        self.frames = 0;
        self.window_start_ms = now_ms;
        Some(fps)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineStats {
    pub dropped_fast: u64,
    pub dropped_malformed: u64,
    pub overlay_coalesced: u64,
}

pub struct Pipeline {
    adapter: FrameAdapter,
    stabilizer: GestureStabilizer,
    stroke: StrokeEngine,
    overlay: OverlayScheduler,
    rect: SurfaceRect,
    brush: BrushSettings,
    overlay_on: bool,
    fps: FpsCounter,
    status: Status,
    last_published: Status,
}

impl Pipeline {
    pub fn new(profile: &Profile) -> Self {
        let th = &profile.thresholds;
        let status = Status {
            hand_detected: false,
            gesture: GestureLabel::None,
            fps: 0,
        };
        Self {
            adapter: FrameAdapter::new(th.min_tick_ms),
            stabilizer: GestureStabilizer::new(th.stable_dwell_ms),
            stroke: StrokeEngine::new(th.min_segment_px),
            overlay: OverlayScheduler::new(th.overlay_delay_ms, th.overlay_clear_ms),
            rect: SurfaceRect::default(),
            brush: profile.brush.clone().into(),
            overlay_on: profile.overlay.show,
            fps: FpsCounter::new(),
            status: status.clone(),
            last_published: status,
        }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            dropped_fast: self.adapter.dropped_fast,
            dropped_malformed: self.adapter.dropped_malformed,
            overlay_coalesced: self.overlay.coalesced,
        }
    }

    /// One detector delivery: an empty landmark set means no hand.
    pub fn on_detector(
        &mut self,
        landmarks: Vec<Keypoint>,
        timestamp_ms: u64,
        now_ms: u64,
        sink: &mut dyn RenderSink,
    ) {
        self.fps.on_frame();
        match self.adapter.ingest(landmarks, timestamp_ms, now_ms) {
            Ingest::Skipped => {}
            Ingest::NoHand => self.on_hand_lost(sink),
            Ingest::Accepted(frame) => {
                self.status.hand_detected = true;
                let label = classify(&frame);
                if let Some(published) = self.stabilizer.observe(label, now_ms) {
                    debug!("gesture published: {published:?}");
                    self.status.gesture = published;
                }
                let cursor = map_index_tip(&frame, &self.rect);
                sink.move_cursor(cursor.screen_x, cursor.screen_y);
                self.stroke
                    .on_gesture(self.stabilizer.published(), cursor, &self.brush, sink);
                if self.overlay_on {
                    self.overlay.request(frame, now_ms);
                }
            }
        }
        self.publish_if_changed(sink);
    }

    fn on_hand_lost(&mut self, sink: &mut dyn RenderSink) {
        if !self.status.hand_detected {
            return;
        }
        self.stabilizer.reset();
        self.stroke.end_stroke();
        sink.hide_cursor();
        if self.overlay_on {
            self.overlay.request_clear();
        }
        self.status.hand_detected = false;
        self.status.gesture = GestureLabel::None;
    }

    /// Fire due timed work: overlay draws/clears and the fps window.
    pub fn poll(&mut self, now_ms: u64, sink: &mut dyn RenderSink) {
        if let Some(fps) = self.fps.tick(now_ms) {
            self.status.fps = fps;
            if fps > 0 && fps < FPS_FLOOR {
                warn!("detector feed running at {fps} fps");
            }
        }
        if let Some(action) = self.overlay.poll(now_ms) {
            match action {
                OverlayAction::Draw(frame) => {
                    let points = project_skeleton(&frame, &self.rect);
                    sink.draw_skeleton(&points);
                }
                OverlayAction::Clear => sink.clear_overlay(),
            }
        }
        self.publish_if_changed(sink);
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.brush.tool = tool;
    }

    pub fn set_color(&mut self, color: String) {
        if color.is_empty() {
            warn!("ignoring empty brush color");
            return;
        }
        self.brush.color = color;
    }

    pub fn set_width(&mut self, width: u32) {
        let clamped = width.clamp(*WIDTH_RANGE.start(), *WIDTH_RANGE.end());
        if clamped != width {
            warn!("brush width {width} out of range, clamped to {clamped}");
        }
        self.brush.width = clamped;
    }

    pub fn set_overlay(&mut self, show: bool) {
        if self.overlay_on && !show {
            self.overlay.request_clear();
        }
        self.overlay_on = show;
    }

    pub fn set_surface(&mut self, rect: SurfaceRect) {
        self.rect = rect;
    }

    pub fn clear_canvas(&mut self, sink: &mut dyn RenderSink) {
        sink.clear();
    }

    pub fn publish_status(&mut self, sink: &mut dyn RenderSink) {
        sink.publish_status(&self.status);
        self.last_published = self.status.clone();
    }

    fn publish_if_changed(&mut self, sink: &mut dyn RenderSink) {
        if self.status != self.last_published {
            self.publish_status(sink);
        }
    }
}
