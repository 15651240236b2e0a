//! Shader compilation and program linking.
//!
//! WGSL stages are parsed and validated with naga (the compiler wgpu uses
//! internally) so failures surface as typed errors with diagnostics instead of
//! device-level panics. A linked [`Program`] is turned into GPU objects by
//! [`GpuProgram`].

mod compiler;
mod error;
mod gpu;
mod program;

pub use compiler::{Shader, ShaderCompiler, ShaderStage};
pub use error::{ProgramLinkError, ShaderCompileError};
pub use gpu::{GpuProgram, ProgramTargets, VertexSlot};
pub use program::{AttributeSlot, Program, ScalarKind, UniformSlot};

/// Built-in WGSL sources.
pub mod sources {
    /// Cube vertex stage: `a_position`, `a_color`, `u_model`, `u_project`.
    pub const CUBE_VERTEX: &str = include_str!("shaders/cube.vert.wgsl");

    /// Cube fragment stage: writes the interpolated vertex color.
    pub const CUBE_FRAGMENT: &str = include_str!("shaders/cube.frag.wgsl");
}
