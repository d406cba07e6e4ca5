//! Render output seam.
//!
//! The pipeline only ever talks to a [`RenderSink`]; the binary plugs
//! in [`JsonSink`] over stdout, tests and embedders use [`MemorySink`].
//! Sink failures are logged, never propagated — the core has no fatal
//! errors.

use std::io::{self, Write};

use log::error;

use crate::mapper::CursorPoint;
use crate::pipeline::Status;
use crate::proto::OutputEvent;
use crate::stroke::BrushSettings;

pub trait RenderSink {
    /// Wipe the drawing surface.
    fn clear(&mut self);
    fn draw_dot(&mut self, p: CursorPoint, brush: &BrushSettings);
    fn draw_segment(&mut self, from: CursorPoint, to: CursorPoint, brush: &BrushSettings);
    /// Skeleton overlay, 21 points in surface pixels.
    fn draw_skeleton(&mut self, points: &[(f32, f32)]);
    fn clear_overlay(&mut self);
    fn move_cursor(&mut self, screen_x: f32, screen_y: f32);
    fn hide_cursor(&mut self);
    fn publish_status(&mut self, status: &Status);
}

/// Emits every render call as one JSON line.
pub struct JsonSink<W: Write> {
    out: W,
}

impl JsonSink<io::StdoutLock<'static>> {
    pub fn stdout() -> Self {
        Self::new(io::stdout().lock())
    }
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn emit(&mut self, event: &OutputEvent) {
        match serde_json::to_string(event) {
            Ok(line) => {
                if let Err(e) = writeln!(self.out, "{line}") {
                    error!("render sink write failed: {e}");
                }
            }
            Err(e) => error!("render event encode failed: {e}"),
        }
    }
}

impl<W: Write> RenderSink for JsonSink<W> {
    fn clear(&mut self) {
        self.emit(&OutputEvent::Clear);
    }

    fn draw_dot(&mut self, p: CursorPoint, brush: &BrushSettings) {
        self.emit(&OutputEvent::Dot {
            x: p.drawing_x,
            y: p.drawing_y,
            tool: brush.tool,
            color: brush.color.clone(),
            width: brush.width,
            composite: brush.tool.composite(),
        });
    }

    fn draw_segment(&mut self, from: CursorPoint, to: CursorPoint, brush: &BrushSettings) {
        self.emit(&OutputEvent::Segment {
            x0: from.drawing_x,
            y0: from.drawing_y,
            x1: to.drawing_x,
            y1: to.drawing_y,
            tool: brush.tool,
            color: brush.color.clone(),
            width: brush.width,
            composite: brush.tool.composite(),
        });
    }

    fn draw_skeleton(&mut self, points: &[(f32, f32)]) {
        self.emit(&OutputEvent::OverlaySkeleton {
            points: points.iter().map(|&(x, y)| [x, y]).collect(),
        });
    }

    fn clear_overlay(&mut self) {
        self.emit(&OutputEvent::OverlayClear);
    }

    fn move_cursor(&mut self, screen_x: f32, screen_y: f32) {
        self.emit(&OutputEvent::Cursor {
            x: screen_x,
            y: screen_y,
        });
    }

    fn hide_cursor(&mut self) {
        self.emit(&OutputEvent::CursorHidden);
    }

    fn publish_status(&mut self, status: &Status) {
        self.emit(&OutputEvent::Status {
            hand_detected: status.hand_detected,
            gesture: status.gesture,
            fps: status.fps,
        });
    }
}

/// Records every render call; the test double for the whole pipeline.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<OutputEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dots(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, OutputEvent::Dot { .. }))
            .count()
    }

    pub fn segments(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, OutputEvent::Segment { .. }))
            .count()
    }

    pub fn skeletons(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, OutputEvent::OverlaySkeleton { .. }))
            .count()
    }
}

impl RenderSink for MemorySink {
    fn clear(&mut self) {
        self.events.push(OutputEvent::Clear);
    }

    fn draw_dot(&mut self, p: CursorPoint, brush: &BrushSettings) {
        self.events.push(OutputEvent::Dot {
            x: p.drawing_x,
            y: p.drawing_y,
            tool: brush.tool,
            color: brush.color.clone(),
            width: brush.width,
            composite: brush.tool.composite(),
        });
    }

    fn draw_segment(&mut self, from: CursorPoint, to: CursorPoint, brush: &BrushSettings) {
        self.events.push(OutputEvent::Segment {
            x0: from.drawing_x,
            y0: from.drawing_y,
            x1: to.drawing_x,
            y1: to.drawing_y,
            tool: brush.tool,
            color: brush.color.clone(),
            width: brush.width,
            composite: brush.tool.composite(),
        });
    }

    fn draw_skeleton(&mut self, points: &[(f32, f32)]) {
        self.events.push(OutputEvent::OverlaySkeleton {
            points: points.iter().map(|&(x, y)| [x, y]).collect(),
        });
    }

    fn clear_overlay(&mut self) {
        self.events.push(OutputEvent::OverlayClear);
    }

    fn move_cursor(&mut self, screen_x: f32, screen_y: f32) {
        self.events.push(OutputEvent::Cursor {
            x: screen_x,
            y: screen_y,
        });
    }

    fn hide_cursor(&mut self) {
        self.events.push(OutputEvent::CursorHidden);
    }

    fn publish_status(&mut self, status: &Status) {
        self.events.push(OutputEvent::Status {
            hand_detected: status.hand_detected,
            gesture: status.gesture,
            fps: status.fps,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Tool;

    #[test]
    fn json_sink_emits_one_line_per_event() {
        let mut buf = Vec::new();
        {
            let mut sink = JsonSink::new(&mut buf);
            sink.draw_dot(
                CursorPoint {
                    drawing_x: 1.0,
                    drawing_y: 2.0,
                    screen_x: 1.0,
                    screen_y: 2.0,
                },
                &BrushSettings {
                    tool: Tool::Eraser,
                    color: "#ffffff".into(),
                    width: 8,
                },
            );
            sink.clear_overlay();
        }
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"ev\":\"dot\""));
        assert!(lines[0].contains("\"composite\":\"destination-out\""));
        assert!(lines[1].contains("\"ev\":\"overlay_clear\""));
    }
}
