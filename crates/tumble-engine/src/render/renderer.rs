use std::collections::HashSet;

use glam::Mat4;
use thiserror::Error;

use crate::device::{create_checked, ResourceError};
use crate::geometry::{AttributeBinding, ElementType, GeometryBufferSet};
use crate::render::{RenderCtx, RenderTarget};
use crate::shader::{GpuProgram, Program, ProgramTargets, ScalarKind, VertexSlot};

use super::depth::DepthTarget;

/// Uniform receiving the model matrix.
pub const MODEL_UNIFORM: &str = "u_model";

/// Uniform receiving the projection matrix.
pub const PROJECTION_UNIFORM: &str = "u_project";

const MAT4_SIZE: u64 = std::mem::size_of::<[f32; 16]>() as u64;

/// The program and the geometry cannot be drawn together, or the device
/// refused one of the renderer's objects.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("vertex input `{name}` at @location({location}) is not fed by any buffer")]
    UnfedInput { name: String, location: u32 },

    #[error("attribute `{name}` holds {element:?} data but the shader reads it as {scalar}")]
    AttributeType {
        name: &'static str,
        element: ElementType,
        scalar: ScalarKind,
    },

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub clear_color: wgpu::Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: wgpu::Color::BLACK,
        }
    }
}

/// Draws the indexed cube geometry with a linked program.
///
/// Pipeline and uniform buffers are built by [`prepare`](Self::prepare) at init;
/// the depth target follows the surface size. The renderer serves a single
/// program for its whole lifetime.
///
/// Buffers the program has no input for, and matrix uniforms it does not use,
/// are skipped. A program input no buffer feeds is an error.
#[derive(Default)]
pub struct Renderer {
    config: RendererConfig,

    gpu_program: Option<GpuProgram>,
    /// Attribute feeding each pipeline vertex slot, in slot order.
    slot_sources: Vec<AttributeBinding>,

    /// One buffer per program uniform, keyed by binding.
    uniform_buffers: Vec<(u32, wgpu::Buffer)>,
    bind_group: Option<wgpu::BindGroup>,

    depth: Option<DepthTarget>,

    warned_missing: HashSet<&'static str>,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Builds the pipeline and uniform buffers for `program` fed by `buffers`.
    ///
    /// Call once the device exists so that failures abort initialization
    /// instead of a frame.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        targets: ProgramTargets,
        program: &Program,
        buffers: &GeometryBufferSet,
    ) -> Result<(), RenderError> {
        self.ensure_pipeline(device, targets, program, buffers)?;
        self.ensure_bindings(device, program)
    }

    /// Clears color and depth, then draws `buffers` with `program`.
    ///
    /// `model` and `projection` are uploaded to `u_model` / `u_project` before
    /// the single indexed triangle-list draw.
    pub fn draw_frame(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        program: &Program,
        buffers: &GeometryBufferSet,
        model: Mat4,
        projection: Mat4,
    ) -> Result<(), RenderError> {
        let targets = ProgramTargets {
            color_format: ctx.surface_format,
            depth_format: Some(ctx.depth_format),
        };
        self.prepare(ctx.device, targets, program, buffers)?;
        self.ensure_depth(ctx)?;

        self.write_matrix(ctx, program, MODEL_UNIFORM, model);
        self.write_matrix(ctx, program, PROJECTION_UNIFORM, projection);

        let (Some(gpu_program), Some(bind_group), Some(depth)) = (
            self.gpu_program.as_ref(),
            self.bind_group.as_ref(),
            self.depth.as_ref(),
        ) else {
            return Ok(());
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tumble cube pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.config.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth.view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(gpu_program.pipeline());
        rpass.set_bind_group(0, bind_group, &[]);

        let sources = buffers.attributes();
        for (slot, binding) in self.slot_sources.iter().enumerate() {
            let Some((_, buffer)) = sources.iter().find(|(b, _)| b.name == binding.name) else {
                continue;
            };
            rpass.set_vertex_buffer(slot as u32, buffer.slice(..));
        }

        rpass.set_index_buffer(buffers.indices().slice(..), buffers.index_format());
        rpass.draw_indexed(0..buffers.index_count(), 0, 0..1);

        Ok(())
    }

    /// Drops the pipeline, uniform buffers and depth target.
    pub fn release(self) {
        if let Some(gpu_program) = self.gpu_program {
            gpu_program.release();
        }
        for (_, buffer) in self.uniform_buffers {
            buffer.destroy();
        }
    }

    fn ensure_pipeline(
        &mut self,
        device: &wgpu::Device,
        targets: ProgramTargets,
        program: &Program,
        buffers: &GeometryBufferSet,
    ) -> Result<(), RenderError> {
        if self.gpu_program.as_ref().map(GpuProgram::targets) == Some(targets) {
            return Ok(());
        }

        let bindings = buffers.attributes().map(|(b, _)| b);
        let mut missing = Vec::new();
        let plan = plan_vertex_slots(program, &bindings, &mut missing)?;
        for name in missing {
            self.warn_missing(name, "attribute");
        }

        let slots: Vec<VertexSlot> = plan.iter().map(|(_, slot)| *slot).collect();
        self.gpu_program = Some(GpuProgram::new(device, program, targets, &slots)?);
        self.slot_sources = plan.into_iter().map(|(b, _)| b).collect();

        // Bindings reference the old layout.
        self.bind_group = None;
        self.uniform_buffers.clear();
        Ok(())
    }

    fn ensure_bindings(&mut self, device: &wgpu::Device, program: &Program) -> Result<(), RenderError> {
        if self.bind_group.is_some() {
            return Ok(());
        }
        let Some(gpu_program) = self.gpu_program.as_ref() else {
            return Ok(());
        };

        self.uniform_buffers = program
            .uniforms()
            .iter()
            .map(|u| -> Result<(u32, wgpu::Buffer), ResourceError> {
                let buffer = create_checked(device, "tumble uniform", || {
                    device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some("tumble uniform"),
                        size: u.size.max(MAT4_SIZE),
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    })
                })?;
                Ok((u.binding, buffer))
            })
            .collect::<Result<_, _>>()?;

        let entries: Vec<wgpu::BindGroupEntry<'_>> = self
            .uniform_buffers
            .iter()
            .map(|(binding, buffer)| wgpu::BindGroupEntry {
                binding: *binding,
                resource: buffer.as_entire_binding(),
            })
            .collect();

        let bind_group = create_checked(device, "tumble uniforms", || {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("tumble uniforms"),
                layout: gpu_program.bind_group_layout(),
                entries: &entries,
            })
        })?;
        self.bind_group = Some(bind_group);
        Ok(())
    }

    fn ensure_depth(&mut self, ctx: &RenderCtx<'_>) -> Result<(), RenderError> {
        if self
            .depth
            .as_ref()
            .is_some_and(|d| d.matches(ctx.depth_format, ctx.viewport))
        {
            return Ok(());
        }
        self.depth = Some(DepthTarget::new(ctx.device, ctx.depth_format, ctx.viewport)?);
        Ok(())
    }

    fn write_matrix(&mut self, ctx: &RenderCtx<'_>, program: &Program, name: &'static str, m: Mat4) {
        let buffer = matrix_binding(program, name).and_then(|binding| {
            self.uniform_buffers
                .iter()
                .find(|(b, _)| *b == binding)
                .map(|(_, buffer)| buffer)
        });

        match buffer {
            Some(buffer) => ctx.queue.write_buffer(buffer, 0, bytemuck::cast_slice(&m.to_cols_array())),
            None => self.warn_missing(name, "mat4 uniform"),
        }
    }

    fn warn_missing(&mut self, name: &'static str, kind: &str) {
        if self.warned_missing.insert(name) {
            log::debug!("program has no {kind} `{name}`; binding skipped");
        }
    }
}

/// Binding of the `mat4x4<f32>` uniform called `name`, if the program uses one.
fn matrix_binding(program: &Program, name: &str) -> Option<u32> {
    program
        .uniform(name)
        .filter(|u| u.size == MAT4_SIZE)
        .map(|u| u.binding)
}

fn feeds(element: ElementType, scalar: ScalarKind) -> bool {
    matches!(
        (element, scalar),
        (ElementType::F32, ScalarKind::Float) | (ElementType::U32, ScalarKind::Uint)
    )
}

/// Pairs each attribute with a vertex slot.
///
/// Names pushed to `missing` are skipped: either the program has no such input
/// or the binding's format has no wgpu equivalent. Fails when a buffer's
/// element type cannot feed its input, or when a program input is left without
/// a buffer.
fn plan_vertex_slots(
    program: &Program,
    bindings: &[AttributeBinding],
    missing: &mut Vec<&'static str>,
) -> Result<Vec<(AttributeBinding, VertexSlot)>, RenderError> {
    let mut plan = Vec::with_capacity(bindings.len());

    for binding in bindings {
        let Some(input) = program.attribute(binding.name) else {
            missing.push(binding.name);
            continue;
        };
        if !feeds(binding.element, input.scalar) {
            return Err(RenderError::AttributeType {
                name: binding.name,
                element: binding.element,
                scalar: input.scalar,
            });
        }

        match binding.vertex_attribute(input.location) {
            Some(attribute) => plan.push((
                *binding,
                VertexSlot {
                    stride: binding.stride,
                    attribute,
                },
            )),
            None => missing.push(binding.name),
        }
    }

    let fed = |name: &str| plan.iter().any(|(b, _)| b.name == name);
    if let Some(input) = program.attributes().iter().find(|a| !fed(a.name.as_str())) {
        return Err(RenderError::UnfedInput {
            name: input.name.clone(),
            location: input.location,
        });
    }

    Ok(plan)
}
