use crate::coords::Viewport;
use crate::device::{create_checked, ResourceError};

/// Depth attachment sized to the surface.
pub(super) struct DepthTarget {
    format: wgpu::TextureFormat,
    viewport: Viewport,
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTarget {
    pub(super) fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Result<Self, ResourceError> {
        let texture = create_checked(device, "tumble depth", || {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some("tumble depth"),
                size: wgpu::Extent3d {
                    width: viewport.width.max(1),
                    height: viewport.height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
        })?;
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!("depth target {}x{} ({format:?})", viewport.width, viewport.height);

        Ok(Self {
            format,
            viewport,
            _texture: texture,
            view,
        })
    }

    pub(super) fn matches(&self, format: wgpu::TextureFormat, viewport: Viewport) -> bool {
        self.format == format && self.viewport == viewport
    }

    pub(super) fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}
