//! Model / projection matrix composition.
//!
//! Matrices are `glam::Mat4` (column-major) and upload directly as uniforms.

mod composer;

pub use composer::{RotationRates, TransformComposer, TransformConfig};
