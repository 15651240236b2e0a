//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, wires them to the GPU layer, and acts
//! as the frame scheduler for the app's render loop.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
