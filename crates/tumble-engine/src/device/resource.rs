use thiserror::Error;

/// A GPU object could not be created.
#[derive(Debug, Clone, Error)]
pub enum ResourceError {
    #[error("{label}: out of GPU memory")]
    OutOfMemory { label: &'static str },

    #[error("{label}: rejected by the device: {message}")]
    Rejected { label: &'static str, message: String },
}

impl ResourceError {
    fn from_wgpu(label: &'static str, err: wgpu::Error) -> Self {
        match err {
            wgpu::Error::OutOfMemory { .. } => Self::OutOfMemory { label },
            other => Self::Rejected {
                label,
                message: other.to_string(),
            },
        }
    }
}

/// Runs `create` inside out-of-memory and validation error scopes.
///
/// Failures wgpu would otherwise route to the uncaptured-error handler are
/// returned as [`ResourceError`]. Native backends report them synchronously, so
/// blocking on the scope is immediate.
pub fn create_checked<T>(
    device: &wgpu::Device,
    label: &'static str,
    create: impl FnOnce() -> T,
) -> Result<T, ResourceError> {
    let oom_scope = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let validation_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let value = create();

    // Scopes pop innermost first.
    let rejected = pollster::block_on(validation_scope.pop());
    let exhausted = pollster::block_on(oom_scope.pop());

    match exhausted.or(rejected) {
        None => Ok(value),
        Some(err) => {
            log::error!("{label}: {err}");
            Err(ResourceError::from_wgpu(label, err))
        }
    }
}
