//! Tumble engine crate.
//!
//! A small wgpu pipeline for a flat-colored cube: shader compile/link, static
//! geometry buffers, per-frame transform composition, a cancellable render loop
//! and the window runtime hosting it.

pub mod coords;
pub mod core;
pub mod device;
pub mod frame_loop;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod shader;
pub mod time;
pub mod transform;
pub mod window;
