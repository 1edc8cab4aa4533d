//! Gesture-driven slide presenter and whiteboard.
//!
//! Each session receives webcam frames, reads one hand's landmarks from an
//! external detector, turns finger poses into debounced commands, and returns
//! the composed slide (or whiteboard) with its drawing overlay and control
//! panel as a JPEG.

pub mod annotate;
pub mod brush;
pub mod codec;
pub mod config;
pub mod debounce;
pub mod deck;
pub mod draw;
pub mod error;
pub mod gesture;
pub mod landmarks;
pub mod orchestrator;
pub mod presentation;
pub mod session;
pub mod types;
pub mod ui;

pub use error::Error;
pub use orchestrator::{FrameResult, Presenter};
pub use session::Session;
