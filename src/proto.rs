//! Line-delimited JSON protocol at the process boundary.
//!
//! The detector collaborator writes `ControlMsg` objects to stdin, one
//! per line; render and status output leaves on stdout as `OutputEvent`
//! lines. Malformed lines are logged and ignored, never fatal.

use serde::{Deserialize, Serialize};

use crate::gesture::GestureLabel;
use crate::landmark::Keypoint;
use crate::stroke::{Composite, Tool};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ControlMsg {
    /// Detector output; an empty landmark set means no hand visible.
    Frame {
        #[serde(default)]
        landmarks: Vec<Keypoint>,
        timestamp_ms: u64,
    },
    Tool { tool: Tool },
    Color { color: String },
    Width { width: u32 },
    Overlay { show: bool },
    /// Drawing-surface geometry on the host page/screen.
    Surface {
        left: f32,
        top: f32,
        width: f32,
        height: f32,
    },
    Clear,
    Status,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "ev", rename_all = "snake_case")]
pub enum OutputEvent {
    Dot {
        x: f32,
        y: f32,
        tool: Tool,
        color: String,
        width: u32,
        composite: Composite,
    },
    Segment {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        tool: Tool,
        color: String,
        width: u32,
        composite: Composite,
    },
    Clear,
    /// 21 surface-pixel points; bone topology is
    /// [`crate::mapper::HAND_CONNECTIONS`].
    OverlaySkeleton { points: Vec<[f32; 2]> },
    OverlayClear,
    Cursor { x: f32, y: f32 },
    CursorHidden,
    Status {
        hand_detected: bool,
        gesture: GestureLabel,
        fps: u32,
    },
}
