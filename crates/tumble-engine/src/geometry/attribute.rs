/// Scalar type of a vertex attribute component.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ElementType {
    F32,
    U32,
}

impl ElementType {
    /// Size of one component in bytes.
    pub const fn size(self) -> u64 {
        match self {
            Self::F32 | Self::U32 => 4,
        }
    }
}

/// How a vertex buffer's bytes map onto a named shader input.
///
/// Components are read unnormalized.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeBinding {
    pub name: &'static str,
    pub components: u32,
    pub element: ElementType,
    /// Bytes between consecutive vertices.
    pub stride: u64,
    /// Byte offset of the first component.
    pub offset: u64,
}

impl AttributeBinding {
    /// Float attribute with `components` floats per vertex, no padding.
    pub const fn packed_f32(name: &'static str, components: u32) -> Self {
        Self {
            name,
            components,
            element: ElementType::F32,
            stride: components as u64 * ElementType::F32.size(),
            offset: 0,
        }
    }

    /// Matching wgpu vertex format, if the combination exists.
    pub fn vertex_format(&self) -> Option<wgpu::VertexFormat> {
        use wgpu::VertexFormat as F;

        let format = match (self.element, self.components) {
            (ElementType::F32, 1) => F::Float32,
            (ElementType::F32, 2) => F::Float32x2,
            (ElementType::F32, 3) => F::Float32x3,
            (ElementType::F32, 4) => F::Float32x4,
            (ElementType::U32, 1) => F::Uint32,
            (ElementType::U32, 2) => F::Uint32x2,
            (ElementType::U32, 3) => F::Uint32x3,
            (ElementType::U32, 4) => F::Uint32x4,
            _ => return None,
        };
        Some(format)
    }

    /// Vertex attribute at `shader_location`, or `None` for an unsupported format.
    pub fn vertex_attribute(&self, shader_location: u32) -> Option<wgpu::VertexAttribute> {
        Some(wgpu::VertexAttribute {
            format: self.vertex_format()?,
            offset: self.offset,
            shader_location,
        })
    }
}
