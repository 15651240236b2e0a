use winit::window::Window;

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::{RenderCtx, RenderTarget};
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Context passed to `App::on_init`.
pub struct InitCtx<'a, 'w> {
    pub gpu: &'a Gpu<'w>,
    pub runtime: &'a mut RuntimeCtx,
}

/// The window's drawing surface for one frame.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct SurfaceCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
}

impl SurfaceCtx<'_, '_> {
    /// Drawable size in physical pixels.
    pub fn viewport(&self) -> Viewport {
        self.gpu.viewport()
    }

    /// Acquires the next surface image, calls `draw` with a ready [`RenderCtx`]
    /// and [`RenderTarget`], then presents.
    ///
    /// Surface errors are recovered where possible; the frame is skipped and
    /// `AppControl::Exit` is returned only for fatal ones.
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        if !self.gpu.viewport().is_valid() {
            return AppControl::Continue;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("unrecoverable surface error");
                        AppControl::Exit
                    }
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        AppControl::Continue
                    }
                };
            }
        };

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.gpu.depth_format(),
            self.gpu.viewport(),
        );

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&rctx, &mut target);
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}

/// Per-frame context passed to `App::on_frame`.
///
/// `surface` and `runtime` are separate fields so a frame body can draw while
/// the runtime is lent to the render loop as its scheduler.
pub struct FrameCtx<'a, 'w> {
    pub surface: SurfaceCtx<'a, 'w>,
    /// Host timestamp in seconds since the runtime started.
    pub now_seconds: f64,
    pub runtime: &'a mut RuntimeCtx,
}
