use thiserror::Error;
use wgpu::util::DeviceExt;

use crate::device::{create_checked, ResourceError};

use super::attribute::AttributeBinding;
use super::cube::{cube_colors, CUBE_INDICES, CUBE_POSITIONS};

/// Geometry upload failure. Fatal for initialization.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("{label}: buffer data is empty")]
    Empty { label: &'static str },

    #[error("{label}: {size} bytes exceeds the device buffer limit of {limit} bytes")]
    TooLarge {
        label: &'static str,
        size: u64,
        limit: u64,
    },

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Static cube buffers uploaded once to GPU memory.
///
/// Buffers are created without `COPY_DST`: nothing can write to them after
/// `build` returns.
#[derive(Debug)]
pub struct GeometryBufferSet {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl GeometryBufferSet {
    pub const POSITION: AttributeBinding = AttributeBinding::packed_f32("a_position", 3);
    pub const COLOR: AttributeBinding = AttributeBinding::packed_f32("a_color", 4);

    /// Uploads the cube positions, colors and indices.
    pub fn build(device: &wgpu::Device) -> Result<Self, GeometryError> {
        let limit = device.limits().max_buffer_size;
        let colors = cube_colors();

        let positions = upload(
            device,
            "tumble cube positions",
            bytemuck::cast_slice(&CUBE_POSITIONS),
            wgpu::BufferUsages::VERTEX,
            limit,
        )?;
        let colors = upload(
            device,
            "tumble cube colors",
            bytemuck::cast_slice(&colors),
            wgpu::BufferUsages::VERTEX,
            limit,
        )?;
        let indices = upload(
            device,
            "tumble cube indices",
            bytemuck::cast_slice(&CUBE_INDICES),
            wgpu::BufferUsages::INDEX,
            limit,
        )?;

        log::debug!(
            "cube geometry uploaded: {} vertices, {} indices",
            CUBE_POSITIONS.len(),
            CUBE_INDICES.len()
        );

        Ok(Self {
            positions,
            colors,
            indices,
            index_count: CUBE_INDICES.len() as u32,
        })
    }

    /// Vertex buffers paired with the attribute each one feeds.
    pub fn attributes(&self) -> [(AttributeBinding, &wgpu::Buffer); 2] {
        [(Self::POSITION, &self.positions), (Self::COLOR, &self.colors)]
    }

    pub fn indices(&self) -> &wgpu::Buffer {
        &self.indices
    }

    /// Index element type.
    pub fn index_format(&self) -> wgpu::IndexFormat {
        wgpu::IndexFormat::Uint16
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Frees the GPU buffers now instead of at drop.
    pub fn release(self) {
        self.positions.destroy();
        self.colors.destroy();
        self.indices.destroy();
        log::debug!("cube geometry released");
    }
}

fn upload(
    device: &wgpu::Device,
    label: &'static str,
    contents: &[u8],
    usage: wgpu::BufferUsages,
    limit: u64,
) -> Result<wgpu::Buffer, GeometryError> {
    let size = contents.len() as u64;
    check_size(label, size, limit)?;

    let buffer = create_checked(device, label, || {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage,
        })
    })?;
    Ok(buffer)
}

fn check_size(label: &'static str, size: u64, limit: u64) -> Result<(), GeometryError> {
    if size == 0 {
        return Err(GeometryError::Empty { label });
    }
    if size > limit {
        return Err(GeometryError::TooLarge { label, size, limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_match_cube_layout() {
        let pos = GeometryBufferSet::POSITION;
        let col = GeometryBufferSet::COLOR;
        assert_eq!(pos.stride as usize, std::mem::size_of::<[f32; 3]>());
        assert_eq!(col.stride as usize, std::mem::size_of::<[f32; 4]>());
        assert_eq!(pos.name, "a_position");
        assert_eq!(col.name, "a_color");
    }

    #[test]
    fn byte_sizes_cover_every_vertex() {
        let pos_bytes: &[u8] = bytemuck::cast_slice(&CUBE_POSITIONS);
        let colors = cube_colors();
        let col_bytes: &[u8] = bytemuck::cast_slice(&colors);
        let idx_bytes: &[u8] = bytemuck::cast_slice(&CUBE_INDICES);

        assert_eq!(pos_bytes.len() as u64, 24 * GeometryBufferSet::POSITION.stride);
        assert_eq!(col_bytes.len() as u64, 24 * GeometryBufferSet::COLOR.stride);
        assert_eq!(idx_bytes.len(), 36 * 2);
    }

    #[test]
    fn size_check_rejects_empty_and_oversized() {
        assert!(matches!(check_size("x", 0, 1024), Err(GeometryError::Empty { .. })));
        assert!(matches!(
            check_size("x", 2048, 1024),
            Err(GeometryError::TooLarge { size: 2048, limit: 1024, .. })
        ));
        assert!(check_size("x", 1024, 1024).is_ok());
    }
}
