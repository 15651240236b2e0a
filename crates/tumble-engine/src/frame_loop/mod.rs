//! Render loop state machine.
//!
//! The loop never talks to the platform directly; the host injects a
//! `FrameScheduler` and calls back into `RenderLoop::run_frame`.

mod render_loop;

pub use render_loop::{FrameScheduler, LoopControl, LoopState, RenderLoop};
