//! GPU rendering subsystem.
//!
//! The renderer consumes a linked program plus static geometry and issues one
//! indexed draw per frame via wgpu. It owns its per-surface GPU resources
//! (pipeline, uniform buffers, depth target).

mod ctx;
mod depth;
mod renderer;

pub use ctx::{RenderCtx, RenderTarget};
pub use renderer::{RenderError, Renderer, RendererConfig, MODEL_UNIFORM, PROJECTION_UNIFORM};
