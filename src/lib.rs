//! Core pipeline for camera-driven hand-gesture drawing.
//!
//! An external landmark detector delivers 21-keypoint hand frames at an
//! irregular cadence; this crate turns that stream into a stable
//! gesture classification, a drawing/cursor state machine, and a
//! throttled render schedule. See `proto` for the wire boundary.

pub mod adapter;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod gesture;
pub mod landmark;
pub mod logging;
pub mod mapper;
pub mod pipeline;
pub mod proto;
pub mod runner;
pub mod scheduler;
pub mod stroke;
