//! Drawing/idle stroke state machine.

use serde::{Deserialize, Serialize};

use crate::canvas::RenderSink;
use crate::gesture::GestureLabel;
use crate::mapper::CursorPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Brush,
    Eraser,
}

/// Canvas compositing mode; the eraser removes pixels regardless of
/// color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Composite {
    SourceOver,
    DestinationOut,
}

impl Tool {
    pub fn composite(self) -> Composite {
        match self {
            Tool::Brush => Composite::SourceOver,
            Tool::Eraser => Composite::DestinationOut,
        }
    }
}

/// Live brush parameters, read at the moment a render is emitted.
/// Tool switches take effect on the next render, never retroactively.
#[derive(Debug, Clone, Deserialize)]
pub struct BrushSettings {
    pub tool: Tool,
    pub color: String,
    pub width: u32,
}

impl From<crate::config::BrushDefaults> for BrushSettings {
    fn from(d: crate::config::BrushDefaults) -> Self {
        Self {
            tool: d.tool,
            color: d.color,
            width: d.width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StrokeState {
    Idle,
    Drawing { last: CursorPoint },
}

pub struct StrokeEngine {
    state: StrokeState,
    min_segment_px: f32,
}

impl StrokeEngine {
    pub fn new(min_segment_px: f32) -> Self {
        Self {
            state: StrokeState::Idle,
            min_segment_px,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    /// Advance the machine with the current published gesture and
    /// cursor. A stroke starts with a dot so a momentary point-and-
    /// release still leaves a mark; extensions under the minimum
    /// segment distance are swallowed and do not move the last point.
    pub fn on_gesture(
        &mut self,
        label: GestureLabel,
        cursor: CursorPoint,
        brush: &BrushSettings,
        sink: &mut dyn RenderSink,
    ) {
        self.state = match (self.state, label) {
            (StrokeState::Idle, GestureLabel::Point) => {
                sink.draw_dot(cursor, brush);
                StrokeState::Drawing { last: cursor }
            }
            (StrokeState::Drawing { last }, GestureLabel::Point) => {
                let dx = cursor.drawing_x - last.drawing_x;
                let dy = cursor.drawing_y - last.drawing_y;
                if (dx * dx + dy * dy).sqrt() > self.min_segment_px {
                    sink.draw_segment(last, cursor, brush);
                    StrokeState::Drawing { last: cursor }
                } else {
                    StrokeState::Drawing { last }
                }
            }
            // peace is reserved for selection and mutates nothing;
            // everything else ends or stays out of the stroke
            _ => StrokeState::Idle,
        };
    }

    /// Forced exit (hand lost); clears the last point.
    pub fn end_stroke(&mut self) {
        self.state = StrokeState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::MemorySink;

    fn brush() -> BrushSettings {
        BrushSettings {
            tool: Tool::Brush,
            color: "#000000".into(),
            width: 5,
        }
    }

    fn at(x: f32, y: f32) -> CursorPoint {
        CursorPoint {
            drawing_x: x,
            drawing_y: y,
            screen_x: x,
            screen_y: y,
        }
    }

    #[test]
    fn point_while_idle_draws_one_dot() {
        let mut engine = StrokeEngine::new(3.0);
        let mut sink = MemorySink::new();
        engine.on_gesture(GestureLabel::Point, at(10.0, 10.0), &brush(), &mut sink);
        assert!(engine.is_drawing());
        assert_eq!(sink.dots(), 1);
        assert_eq!(sink.segments(), 0);
    }

    #[test]
    fn sub_threshold_motion_emits_nothing() {
        let mut engine = StrokeEngine::new(3.0);
        let mut sink = MemorySink::new();
        engine.on_gesture(GestureLabel::Point, at(10.0, 10.0), &brush(), &mut sink);
        for dx in [0.5, 1.0, 2.0, 3.0] {
            engine.on_gesture(GestureLabel::Point, at(10.0 + dx, 10.0), &brush(), &mut sink);
        }
        assert_eq!(sink.segments(), 0);
    }

    #[test]
    fn five_px_motion_emits_one_segment_and_moves_last() {
        let mut engine = StrokeEngine::new(3.0);
        let mut sink = MemorySink::new();
        engine.on_gesture(GestureLabel::Point, at(10.0, 10.0), &brush(), &mut sink);
        engine.on_gesture(GestureLabel::Point, at(15.0, 10.0), &brush(), &mut sink);
        assert_eq!(sink.segments(), 1);
        // 2px from the *new* last point: swallowed
        engine.on_gesture(GestureLabel::Point, at(17.0, 10.0), &brush(), &mut sink);
        assert_eq!(sink.segments(), 1);
        // 4px from (15,10): emitted
        engine.on_gesture(GestureLabel::Point, at(19.0, 10.0), &brush(), &mut sink);
        assert_eq!(sink.segments(), 2);
    }

    #[test]
    fn other_gestures_end_the_stroke() {
        let mut engine = StrokeEngine::new(3.0);
        let mut sink = MemorySink::new();
        engine.on_gesture(GestureLabel::Point, at(10.0, 10.0), &brush(), &mut sink);
        engine.on_gesture(GestureLabel::Open, at(50.0, 50.0), &brush(), &mut sink);
        assert!(!engine.is_drawing());
        // re-entry starts a fresh stroke with a fresh dot
        engine.on_gesture(GestureLabel::Point, at(60.0, 60.0), &brush(), &mut sink);
        assert_eq!(sink.dots(), 2);
        assert_eq!(sink.segments(), 0);
    }

    #[test]
    fn peace_mutates_nothing_while_idle() {
        let mut engine = StrokeEngine::new(3.0);
        let mut sink = MemorySink::new();
        engine.on_gesture(GestureLabel::Peace, at(10.0, 10.0), &brush(), &mut sink);
        assert!(!engine.is_drawing());
        assert!(sink.events.is_empty());
    }

    #[test]
    fn forced_end_clears_the_last_point() {
        let mut engine = StrokeEngine::new(3.0);
        let mut sink = MemorySink::new();
        engine.on_gesture(GestureLabel::Point, at(10.0, 10.0), &brush(), &mut sink);
        engine.end_stroke();
        assert!(!engine.is_drawing());
    }
}
