//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue for a window
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering
//! - turning GPU object creation failures into typed errors

mod error;
mod gpu;
mod init;
mod resource;
mod surface;

pub use error::{DeviceInitError, SurfaceErrorAction};
pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use resource::{create_checked, ResourceError};
