use crate::device::{create_checked, ResourceError};

use super::program::Program;

/// Output formats a program is built for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ProgramTargets {
    pub color_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
}

/// One vertex buffer slot feeding a single attribute.
#[derive(Debug, Copy, Clone)]
pub struct VertexSlot {
    pub stride: u64,
    pub attribute: wgpu::VertexAttribute,
}

/// GPU side of a linked [`Program`]: shader modules, bind group layout and render
/// pipeline.
///
/// Vertex slot `i` of the pipeline is `slots[i]` as passed to [`GpuProgram::new`].
/// Group 0 holds one uniform buffer per `program.uniforms()` entry.
#[derive(Debug)]
pub struct GpuProgram {
    targets: ProgramTargets,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl GpuProgram {
    /// Creates the GPU objects for an already linked program.
    ///
    /// Anything the device rejects (a slot layout the shader cannot consume, an
    /// unsupported target format) is returned as a [`ResourceError`].
    pub fn new(
        device: &wgpu::Device,
        program: &Program,
        targets: ProgramTargets,
        slots: &[VertexSlot],
    ) -> Result<Self, ResourceError> {
        let (bind_group_layout, pipeline) = create_checked(device, "tumble pipeline", || {
            Self::create(device, program, targets, slots)
        })?;

        log::debug!(
            "pipeline created for {:?} (depth {:?}, {} vertex slot(s))",
            targets.color_format,
            targets.depth_format,
            slots.len()
        );

        Ok(Self {
            targets,
            pipeline,
            bind_group_layout,
        })
    }

    fn create(
        device: &wgpu::Device,
        program: &Program,
        targets: ProgramTargets,
        slots: &[VertexSlot],
    ) -> (wgpu::BindGroupLayout, wgpu::RenderPipeline) {
        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tumble vertex shader"),
            source: wgpu::ShaderSource::Wgsl(program.vertex().source().into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tumble fragment shader"),
            source: wgpu::ShaderSource::Wgsl(program.fragment().source().into()),
        });

        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = program
            .uniforms()
            .iter()
            .map(|u| wgpu::BindGroupLayoutEntry {
                binding: u.binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(u.size),
                },
                count: None,
            })
            .collect();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tumble uniforms bgl"),
            entries: &layout_entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tumble pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        // VertexBufferLayout borrows its attribute slice.
        let attributes: Vec<[wgpu::VertexAttribute; 1]> =
            slots.iter().map(|s| [s.attribute]).collect();
        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = slots
            .iter()
            .zip(&attributes)
            .map(|(slot, attrs)| wgpu::VertexBufferLayout {
                array_stride: slot.stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tumble pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(program.vertex().entry_point()),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(program.fragment().entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: targets.color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: targets.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        (bind_group_layout, pipeline)
    }

    pub fn targets(&self) -> ProgramTargets {
        self.targets
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Drops the pipeline and its shader modules.
    pub fn release(self) {
        log::debug!("pipeline for {:?} released", self.targets.color_format);
    }
}
