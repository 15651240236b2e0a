//! Cube geometry: literal vertex data and its one-time GPU upload.

mod attribute;
mod buffers;
mod cube;

pub use attribute::{AttributeBinding, ElementType};
pub use buffers::{GeometryBufferSet, GeometryError};
pub use cube::{
    cube_colors, CUBE_INDICES, CUBE_POSITIONS, CUBE_VERTEX_COUNT, FACE_COLORS, FACE_COUNT,
    VERTICES_PER_FACE,
};
