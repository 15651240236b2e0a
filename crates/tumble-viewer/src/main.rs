use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use tumble_engine::core::{App, AppControl, FrameCtx, InitCtx};
use tumble_engine::device::GpuInit;
use tumble_engine::frame_loop::{LoopControl, RenderLoop};
use tumble_engine::geometry::GeometryBufferSet;
use tumble_engine::logging::{init_logging, LoggingConfig};
use tumble_engine::render::{Renderer, RendererConfig};
use tumble_engine::shader::{sources, Program, ProgramTargets, ShaderCompiler, ShaderStage};
use tumble_engine::transform::{TransformComposer, TransformConfig};
use tumble_engine::window::{Runtime, RuntimeConfig, RuntimeCtx};

/// Resources built once the GPU exists.
struct Scene {
    program: Program,
    geometry: GeometryBufferSet,
}

/// Spinning cube: Space pauses/resumes, Escape quits.
struct CubeApp {
    transform: TransformComposer,
    render_loop: RenderLoop,
    renderer: Renderer,
    scene: Option<Scene>,
}

impl CubeApp {
    fn new(transform: TransformConfig, renderer: RendererConfig) -> Self {
        Self {
            transform: TransformComposer::new(transform),
            render_loop: RenderLoop::new(),
            renderer: Renderer::new(renderer),
            scene: None,
        }
    }

    fn toggle_pause(&mut self, runtime: &mut RuntimeCtx) {
        if self.render_loop.is_running() {
            self.render_loop.stop();
            log::info!("paused at {:.2} rad", self.render_loop.frame_state().rotation_angle);
        } else {
            self.render_loop.start(runtime);
            log::info!("resumed");
        }
    }
}

impl App for CubeApp {
    fn on_init(&mut self, ctx: &mut InitCtx<'_, '_>) -> anyhow::Result<()> {
        let mut compiler = ShaderCompiler::new();
        let vertex = compiler.compile(sources::CUBE_VERTEX, ShaderStage::Vertex)?;
        let fragment = compiler.compile(sources::CUBE_FRAGMENT, ShaderStage::Fragment)?;
        let program = compiler.link(vertex, fragment)?;

        let geometry = GeometryBufferSet::build(ctx.gpu.device())?;

        let targets = ProgramTargets {
            color_format: ctx.gpu.surface_format(),
            depth_format: Some(ctx.gpu.depth_format()),
        };
        self.renderer.prepare(ctx.gpu.device(), targets, &program, &geometry)?;

        self.scene = Some(Scene { program, geometry });
        self.render_loop.start(&mut *ctx.runtime);
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent, runtime: &mut RuntimeCtx) -> AppControl {
        let WindowEvent::KeyboardInput { event: key, .. } = event else {
            return AppControl::Continue;
        };
        if key.state != ElementState::Pressed || key.repeat {
            return AppControl::Continue;
        }

        match key.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => AppControl::Exit,
            PhysicalKey::Code(KeyCode::Space) => {
                self.toggle_pause(runtime);
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(scene) = self.scene.as_ref() else {
            return AppControl::Continue;
        };

        let aspect = ctx.surface.viewport().aspect().unwrap_or(0.0);
        let transform = &mut self.transform;
        let renderer = &mut self.renderer;
        let mut control = AppControl::Continue;

        self.render_loop
            .run_frame(ctx.now_seconds, &mut *ctx.runtime, |ft| {
                let projection = transform.projection_for(aspect);
                let model = transform.model(ft.state.rotation_angle as f32);

                let mut failed = false;
                control = ctx.surface.render(|rctx, target| {
                    let drawn = renderer.draw_frame(
                        rctx,
                        target,
                        &scene.program,
                        &scene.geometry,
                        model,
                        projection,
                    );
                    if let Err(err) = drawn {
                        log::error!("frame failed: {err}");
                        failed = true;
                    }
                });
                if failed {
                    control = AppControl::Exit;
                }

                match control {
                    AppControl::Continue => LoopControl::Continue,
                    AppControl::Exit => LoopControl::Stop,
                }
            });

        control
    }

    fn on_exit(&mut self) {
        self.render_loop.stop();
        std::mem::take(&mut self.renderer).release();
        if let Some(scene) = self.scene.take() {
            scene.geometry.release();
            scene.program.release();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let app = CubeApp::new(TransformConfig::default(), RendererConfig::default());

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), app)?;
    log::info!("viewer exited");
    Ok(())
}
