//! Core engine-facing contracts.
//!
//! This module defines the interface between the window runtime (platform loop)
//! and the application driving the renderer.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, InitCtx, SurfaceCtx};
