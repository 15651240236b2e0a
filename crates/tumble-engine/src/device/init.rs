use super::error::DeviceInitError;

/// What the cube window asks of the adapter, device and surface.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB swapchain format if the surface offers one.
    pub prefer_srgb: bool,

    /// Fifo is vsync-paced and always available.
    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when `None` or unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint only; backends may ignore it.
    pub desired_maximum_frame_latency: u32,

    /// Depth attachment format for the depth-tested cube pass.
    pub depth_format: wgpu::TextureFormat,
}

impl GpuInit {
    pub fn with_depth_format(mut self, depth_format: wgpu::TextureFormat) -> Self {
        self.depth_format = depth_format;
        self
    }

    /// Rejects settings no device could satisfy, before any GPU object exists.
    pub fn validate(&self) -> Result<(), DeviceInitError> {
        if !self.depth_format.has_depth_aspect() {
            return Err(DeviceInitError::NotADepthFormat(self.depth_format));
        }
        if self.desired_maximum_frame_latency == 0 {
            return Err(DeviceInitError::ZeroFrameLatency);
        }
        Ok(())
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            depth_format: wgpu::TextureFormat::Depth32Float,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(GpuInit::default().validate().is_ok());
    }

    #[test]
    fn color_format_is_not_a_depth_target() {
        let init = GpuInit::default().with_depth_format(wgpu::TextureFormat::Rgba8Unorm);
        assert!(matches!(
            init.validate(),
            Err(DeviceInitError::NotADepthFormat(wgpu::TextureFormat::Rgba8Unorm))
        ));
    }

    #[test]
    fn depth24_stencil_is_accepted() {
        let init = GpuInit::default().with_depth_format(wgpu::TextureFormat::Depth24PlusStencil8);
        assert!(init.validate().is_ok());
    }

    #[test]
    fn zero_frame_latency_is_rejected() {
        let init = GpuInit {
            desired_maximum_frame_latency: 0,
            ..GpuInit::default()
        };
        assert!(matches!(init.validate(), Err(DeviceInitError::ZeroFrameLatency)));
    }
}
