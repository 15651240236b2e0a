use thiserror::Error;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// The drawing surface could not provide a rendering context.
#[derive(Debug, Error)]
pub enum DeviceInitError {
    #[error("window has zero size")]
    ZeroSize,

    #[error("{0:?} has no depth aspect")]
    NotADepthFormat(wgpu::TextureFormat),

    #[error("desired frame latency must be at least 1")]
    ZeroFrameLatency,

    #[error("failed to create wgpu surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find a suitable GPU adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create wgpu device/queue")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("no supported surface formats")]
    NoSurfaceFormat,
}
