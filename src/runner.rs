//! The event loop: detector frames and UI controls in, render events
//! out.
//!
//! Pipeline logic is single-threaded; the only helper thread shuttles
//! stdin lines into an mpsc channel so the loop can interleave input
//! with scheduler polls. Timestamps come from one monotonic clock
//! owned by the loop.

use anyhow::Result;
use log::{info, warn};
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::{fs, thread};
use std::time::{Duration, Instant};

use crate::canvas::{JsonSink, RenderSink};
use crate::config::Profile;
use crate::mapper::SurfaceRect;
use crate::pipeline::Pipeline;
use crate::proto::ControlMsg;

const IDLE_SLEEP: Duration = Duration::from_millis(4);

/// Live mode: read the detector stream from stdin until EOF or signal.
pub fn run_stream(profile: &Profile) -> Result<()> {
    let term = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, term.clone())?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, term.clone())?;

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) => {
                    if tx.send(l).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    let mut sink = JsonSink::stdout();
    let mut pipeline = Pipeline::new(profile);
    let start = Instant::now();

    pipeline.publish_status(&mut sink);
    info!(
        "pipeline: profile '{}', reading detector frames from stdin",
        profile.meta.name.as_deref().unwrap_or("unnamed")
    );

    loop {
        if term.load(Ordering::Relaxed) {
            info!("pipeline: signal received, shutting down");
            break;
        }
        let now_ms = start.elapsed().as_millis() as u64;

        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(line) => handle_line(&line, &mut pipeline, now_ms, &mut sink),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        pipeline.poll(now_ms, &mut sink);

        if disconnected {
            info!("pipeline: detector stream closed");
            break;
        }
        thread::sleep(IDLE_SLEEP);
    }

    let stats = pipeline.stats();
    info!(
        "pipeline: done ({} fast drops, {} malformed drops, {} overlay frames coalesced)",
        stats.dropped_fast, stats.dropped_malformed, stats.overlay_coalesced
    );
    Ok(())
}

/// Offline mode: replay a recorded frame file, clocked by the frame
/// timestamps instead of wall time.
pub fn simulate(path: &Path, profile: &Profile) -> Result<()> {
    let text = fs::read_to_string(path)?;
    let mut sink = JsonSink::stdout();
    let mut pipeline = Pipeline::new(profile);
    let mut now_ms: u64 = 0;

    pipeline.publish_status(&mut sink);
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ControlMsg>(line) {
            Ok(msg) => {
                if let ControlMsg::Frame { timestamp_ms, .. } = &msg {
                    now_ms = now_ms.max(*timestamp_ms);
                }
                apply(msg, &mut pipeline, now_ms, &mut sink);
            }
            Err(e) => warn!("ignoring malformed input line: {e}"),
        }
        pipeline.poll(now_ms, &mut sink);
    }

    // flush the overlay schedule past its last deadline
    let drain_until =
        now_ms + profile.thresholds.overlay_delay_ms + profile.thresholds.overlay_clear_ms + 1;
    while now_ms < drain_until {
        now_ms += 10;
        pipeline.poll(now_ms, &mut sink);
    }

    let stats = pipeline.stats();
    info!(
        "simulate: {} fast drops, {} malformed drops, {} overlay frames coalesced",
        stats.dropped_fast, stats.dropped_malformed, stats.overlay_coalesced
    );
    Ok(())
}

fn handle_line(line: &str, pipeline: &mut Pipeline, now_ms: u64, sink: &mut dyn RenderSink) {
    if line.trim().is_empty() {
        return;
    }
    match serde_json::from_str::<ControlMsg>(line) {
        Ok(msg) => apply(msg, pipeline, now_ms, sink),
        Err(e) => warn!("ignoring malformed input line: {e}"),
    }
}

fn apply(msg: ControlMsg, pipeline: &mut Pipeline, now_ms: u64, sink: &mut dyn RenderSink) {
    match msg {
        ControlMsg::Frame {
            landmarks,
            timestamp_ms,
        } => pipeline.on_detector(landmarks, timestamp_ms, now_ms, sink),
        ControlMsg::Tool { tool } => pipeline.set_tool(tool),
        ControlMsg::Color { color } => pipeline.set_color(color),
        ControlMsg::Width { width } => pipeline.set_width(width),
        ControlMsg::Overlay { show } => pipeline.set_overlay(show),
        ControlMsg::Surface {
            left,
            top,
            width,
            height,
        } => pipeline.set_surface(SurfaceRect {
            left,
            top,
            width,
            height,
        }),
        ControlMsg::Clear => pipeline.clear_canvas(sink),
        ControlMsg::Status => pipeline.publish_status(sink),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::MemorySink;
    use crate::proto::OutputEvent;
    use crate::stroke::Tool;

    #[test]
    fn control_lines_reach_the_pipeline() {
        let profile = Profile::embedded_default().unwrap();
        let mut pipeline = Pipeline::new(&profile);
        let mut sink = MemorySink::new();

        handle_line(r#"{"op":"tool","tool":"eraser"}"#, &mut pipeline, 0, &mut sink);
        handle_line(r#"{"op":"clear"}"#, &mut pipeline, 0, &mut sink);
        handle_line(r#"{"op":"status"}"#, &mut pipeline, 0, &mut sink);
        handle_line("not json", &mut pipeline, 0, &mut sink);

        assert!(sink.events.contains(&OutputEvent::Clear));
        assert!(sink
            .events
            .iter()
            .any(|e| matches!(e, OutputEvent::Status { .. })));
    }

    #[test]
    fn frame_lines_drive_drawing() {
        let profile = Profile::embedded_default().unwrap();
        let mut pipeline = Pipeline::new(&profile);
        let mut sink = MemorySink::new();

        // a pointing hand: index extended, others curled
        let mut landmarks = vec![serde_json::json!({"x":0.5,"y":0.8,"z":0.0}); 21];
        for pip in [6, 10, 14, 18] {
            landmarks[pip] = serde_json::json!({"x":0.5,"y":0.5,"z":0.0});
        }
        for tip in [12, 16, 20] {
            landmarks[tip] = serde_json::json!({"x":0.5,"y":0.7,"z":0.0});
        }
        landmarks[8] = serde_json::json!({"x":0.5,"y":0.25,"z":0.0});

        let mut t = 0u64;
        for _ in 0..8 {
            let line = serde_json::json!({
                "op": "frame",
                "landmarks": landmarks,
                "timestamp_ms": t,
            })
            .to_string();
            handle_line(&line, &mut pipeline, t, &mut sink);
            t += 33;
        }
        assert_eq!(sink.dots(), 1);
        assert!(matches!(
            sink.events.iter().find(|e| matches!(e, OutputEvent::Dot { .. })),
            Some(OutputEvent::Dot {
                tool: Tool::Brush,
                ..
            })
        ));
    }
}
