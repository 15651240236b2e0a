use std::fmt;

use super::compiler::{Shader, ShaderStage};
use super::error::ProgramLinkError;

/// Scalar type a vertex input is read as.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScalarKind {
    Float,
    Sint,
    Uint,
    Bool,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => f.write_str("float"),
            Self::Sint => f.write_str("signed integer"),
            Self::Uint => f.write_str("unsigned integer"),
            Self::Bool => f.write_str("bool"),
        }
    }
}

/// A named vertex input and its `@location`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AttributeSlot {
    pub name: String,
    pub location: u32,
    pub scalar: ScalarKind,
    /// 1 for scalars, 2..=4 for vectors.
    pub components: u32,
}

/// A uniform used by the program, in bind group 0.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniformSlot {
    pub name: String,
    pub binding: u32,
    /// Size of the uniform type in bytes.
    pub size: u64,
}

/// A linked vertex + fragment pair with reflected inputs.
///
/// Lookups return `None` for names the program does not use, including uniforms
/// that are declared but never read by either entry point.
pub struct Program {
    vertex: Shader,
    fragment: Shader,
    attributes: Vec<AttributeSlot>,
    uniforms: Vec<UniformSlot>,
}

impl Program {
    pub fn vertex(&self) -> &Shader {
        &self.vertex
    }

    pub fn fragment(&self) -> &Shader {
        &self.fragment
    }

    pub fn attributes(&self) -> &[AttributeSlot] {
        &self.attributes
    }

    pub fn uniforms(&self) -> &[UniformSlot] {
        &self.uniforms
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSlot> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// `@location` of the vertex input called `name`.
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.attribute(name).map(|a| a.location)
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformSlot> {
        self.uniforms.iter().find(|u| u.name == name)
    }

    /// `@binding` (group 0) of the uniform called `name`.
    pub fn uniform_binding(&self, name: &str) -> Option<u32> {
        self.uniform(name).map(|u| u.binding)
    }

    /// Drops the program together with both stages.
    pub fn release(self) {
        log::debug!(
            "program `{}`/`{}` released",
            self.vertex.entry_point(),
            self.fragment.entry_point()
        );
        self.vertex.release();
        self.fragment.release();
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("vertex", &self.vertex)
            .field("fragment", &self.fragment)
            .field("attributes", &self.attributes)
            .field("uniforms", &self.uniforms)
            .finish()
    }
}

pub(crate) fn link_program(vertex: Shader, fragment: Shader) -> Result<Program, ProgramLinkError> {
    let mut problems = Vec::new();

    if vertex.stage != ShaderStage::Vertex {
        problems.push(format!("expected a vertex shader, got a {} shader", vertex.stage));
    }
    if fragment.stage != ShaderStage::Fragment {
        problems.push(format!("expected a fragment shader, got a {} shader", fragment.stage));
    }
    if !problems.is_empty() {
        return Err(ProgramLinkError::from_problems(&problems));
    }

    // Interface matching: every fragment input must be produced by the vertex
    // stage with the same type and interpolation.
    let mut outputs = Vec::new();
    if let Some(result) = &vertex.entry().function.result {
        collect_locations(&vertex.module, result.binding.as_ref(), result.ty, None, &mut outputs);
    }

    let mut inputs = Vec::new();
    for arg in &fragment.entry().function.arguments {
        collect_locations(
            &fragment.module,
            arg.binding.as_ref(),
            arg.ty,
            arg.name.as_deref(),
            &mut inputs,
        );
    }
    for input in &inputs {
        let name = input.name.as_deref().unwrap_or("<unnamed>");
        let loc = input.location;
        match outputs.iter().find(|o| o.location == loc) {
            None => problems.push(format!(
                "fragment input `{name}` at @location({loc}) is not written by the vertex stage"
            )),
            Some(output) if output.inner != input.inner => problems.push(format!(
                "fragment input `{name}` at @location({loc}) is {} but the vertex stage writes {}",
                type_name(&input.inner),
                type_name(&output.inner)
            )),
            Some(output) if output.interpolation() != input.interpolation() => {
                problems.push(format!(
                    "fragment input `{name}` at @location({loc}) is interpolated as {:?} but the vertex stage writes {:?}",
                    input.interpolation(),
                    output.interpolation()
                ))
            }
            Some(_) => {}
        }
    }

    let mut raw_attributes = Vec::new();
    for arg in &vertex.entry().function.arguments {
        collect_locations(
            &vertex.module,
            arg.binding.as_ref(),
            arg.ty,
            arg.name.as_deref(),
            &mut raw_attributes,
        );
    }
    let mut attributes = Vec::new();
    for input in raw_attributes {
        let Some((scalar, components)) = scalar_shape(&input.inner) else {
            continue;
        };
        if let Some(name) = input.name {
            attributes.push(AttributeSlot {
                name,
                location: input.location,
                scalar,
                components,
            });
        }
    }

    let mut uniforms: Vec<UniformSlot> = Vec::new();
    for shader in [&vertex, &fragment] {
        for slot in used_uniforms(shader, &mut problems) {
            if let Some(existing) = uniforms.iter().find(|u| u.name == slot.name) {
                if existing.binding != slot.binding {
                    problems.push(format!(
                        "uniform `{}` is bound to @binding({}) and @binding({})",
                        slot.name, existing.binding, slot.binding
                    ));
                }
                continue;
            }
            if let Some(other) = uniforms.iter().find(|u| u.binding == slot.binding) {
                problems.push(format!(
                    "uniforms `{}` and `{}` share @binding({})",
                    other.name, slot.name, slot.binding
                ));
                continue;
            }
            uniforms.push(slot);
        }
    }

    if !problems.is_empty() {
        return Err(ProgramLinkError::from_problems(&problems));
    }

    uniforms.sort_by_key(|u| u.binding);

    Ok(Program {
        vertex,
        fragment,
        attributes,
        uniforms,
    })
}

/// One `@location` value crossing a stage boundary.
struct Varying {
    name: Option<String>,
    location: u32,
    inner: naga::TypeInner,
    interpolation: Option<naga::Interpolation>,
    sampling: Option<naga::Sampling>,
}

impl Varying {
    /// Interpolation with WGSL defaults filled in: perspective/center for
    /// floats, flat (sampling ignored) for everything else.
    fn interpolation(&self) -> (naga::Interpolation, Option<naga::Sampling>) {
        let is_float = matches!(scalar_shape(&self.inner), Some((ScalarKind::Float, _)));
        let default = if is_float {
            naga::Interpolation::Perspective
        } else {
            naga::Interpolation::Flat
        };

        match self.interpolation.unwrap_or(default) {
            naga::Interpolation::Flat => (naga::Interpolation::Flat, None),
            other => (other, Some(self.sampling.unwrap_or(naga::Sampling::Center))),
        }
    }
}

/// Collects `@location` bindings of a value, looking through struct members.
fn collect_locations(
    module: &naga::Module,
    binding: Option<&naga::Binding>,
    ty: naga::Handle<naga::Type>,
    name: Option<&str>,
    out: &mut Vec<Varying>,
) {
    match binding {
        Some(naga::Binding::Location {
            location,
            interpolation,
            sampling,
            ..
        }) => {
            out.push(Varying {
                name: name.map(str::to_owned),
                location: *location,
                inner: module.types[ty].inner.clone(),
                interpolation: *interpolation,
                sampling: *sampling,
            });
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(
                        module,
                        member.binding.as_ref(),
                        member.ty,
                        member.name.as_deref(),
                        out,
                    );
                }
            }
        }
    }
}

fn scalar_kind(scalar: naga::Scalar) -> ScalarKind {
    match scalar.kind {
        naga::ScalarKind::Float | naga::ScalarKind::AbstractFloat => ScalarKind::Float,
        naga::ScalarKind::Sint | naga::ScalarKind::AbstractInt => ScalarKind::Sint,
        naga::ScalarKind::Uint => ScalarKind::Uint,
        naga::ScalarKind::Bool => ScalarKind::Bool,
    }
}

/// Scalar kind and component count of a scalar or vector type.
fn scalar_shape(inner: &naga::TypeInner) -> Option<(ScalarKind, u32)> {
    match *inner {
        naga::TypeInner::Scalar(scalar) => Some((scalar_kind(scalar), 1)),
        naga::TypeInner::Vector { size, scalar } => Some((scalar_kind(scalar), size as u32)),
        _ => None,
    }
}

/// WGSL spelling of a stage I/O type, for diagnostics.
fn type_name(inner: &naga::TypeInner) -> String {
    fn scalar_name(scalar: naga::Scalar) -> String {
        let prefix = match scalar.kind {
            naga::ScalarKind::Float | naga::ScalarKind::AbstractFloat => "f",
            naga::ScalarKind::Sint | naga::ScalarKind::AbstractInt => "i",
            naga::ScalarKind::Uint => "u",
            naga::ScalarKind::Bool => return "bool".to_owned(),
        };
        format!("{prefix}{}", u32::from(scalar.width) * 8)
    }

    match *inner {
        naga::TypeInner::Scalar(scalar) => scalar_name(scalar),
        naga::TypeInner::Vector { size, scalar } => {
            format!("vec{}<{}>", size as u32, scalar_name(scalar))
        }
        ref other => format!("{other:?}"),
    }
}

/// Uniforms actually read by the shader's entry point.
fn used_uniforms(shader: &Shader, problems: &mut Vec<String>) -> Vec<UniformSlot> {
    let usage = shader.info.get_entry_point(shader.entry_point);
    let mut slots = Vec::new();

    for (handle, var) in shader.module.global_variables.iter() {
        if var.space != naga::AddressSpace::Uniform || usage[handle].is_empty() {
            continue;
        }
        let (Some(name), Some(rb)) = (&var.name, &var.binding) else {
            continue;
        };
        if rb.group != 0 {
            problems.push(format!(
                "uniform `{name}` uses @group({}); only group 0 is supported",
                rb.group
            ));
            continue;
        }

        let size = shader.module.types[var.ty]
            .inner
            .size(shader.module.to_ctx());

        slots.push(UniformSlot {
            name: name.clone(),
            binding: rb.binding,
            size: u64::from(size),
        });
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{sources, ShaderCompiler};

    fn compile(src: &str, stage: ShaderStage) -> Shader {
        ShaderCompiler::new()
            .compile(src, stage)
            .expect("test shader compiles")
    }

    fn cube_program() -> Program {
        let compiler = ShaderCompiler::new();
        compiler
            .link(
                compile(sources::CUBE_VERTEX, ShaderStage::Vertex),
                compile(sources::CUBE_FRAGMENT, ShaderStage::Fragment),
            )
            .expect("cube program links")
    }

    const PLAIN_FS: &str = r#"
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0);
        }
    "#;

    #[test]
    fn cube_program_reflects_attributes() {
        let program = cube_program();
        assert_eq!(program.attribute_location("a_position"), Some(0));
        assert_eq!(program.attribute_location("a_color"), Some(1));
        assert_eq!(program.attribute_location("a_normal"), None);
    }

    #[test]
    fn cube_attributes_are_float_vec4() {
        let program = cube_program();
        for name in ["a_position", "a_color"] {
            let slot = program.attribute(name).expect("cube attribute is reflected");
            assert_eq!(slot.scalar, ScalarKind::Float);
            assert_eq!(slot.components, 4);
        }
    }

    #[test]
    fn cube_program_reflects_uniforms() {
        let program = cube_program();
        assert_eq!(program.uniform_binding("u_model"), Some(0));
        assert_eq!(program.uniform_binding("u_project"), Some(1));
        assert_eq!(program.uniform_binding("u_view"), None);
        assert_eq!(program.uniform("u_model").map(|u| u.size), Some(64));
    }

    #[test]
    fn unused_uniform_is_not_found() {
        let vs = r#"
            @group(0) @binding(0) var<uniform> u_used: mat4x4<f32>;
            @group(0) @binding(1) var<uniform> u_unused: mat4x4<f32>;

            @vertex
            fn vs_main(@location(0) a_position: vec4<f32>) -> @builtin(position) vec4<f32> {
                return u_used * a_position;
            }
        "#;
        let program = ShaderCompiler::new()
            .link(compile(vs, ShaderStage::Vertex), compile(PLAIN_FS, ShaderStage::Fragment))
            .expect("links");

        assert_eq!(program.uniform_binding("u_used"), Some(0));
        assert_eq!(program.uniform_binding("u_unused"), None);
    }

    #[test]
    fn swapped_stages_fail_to_link() {
        let compiler = ShaderCompiler::new();
        let err = compiler
            .link(
                compile(sources::CUBE_FRAGMENT, ShaderStage::Fragment),
                compile(sources::CUBE_VERTEX, ShaderStage::Vertex),
            )
            .expect_err("stages are swapped");

        assert!(err.log.contains("expected a vertex shader"));
        assert!(err.log.contains("expected a fragment shader"));
    }

    #[test]
    fn unmatched_fragment_input_fails_to_link() {
        let vs = r#"
            @vertex
            fn vs_main(@location(0) a_position: vec4<f32>) -> @builtin(position) vec4<f32> {
                return a_position;
            }
        "#;
        let err = ShaderCompiler::new()
            .link(
                compile(vs, ShaderStage::Vertex),
                compile(sources::CUBE_FRAGMENT, ShaderStage::Fragment),
            )
            .expect_err("v_color is never written");

        assert!(err.log.contains("v_color"));
        assert!(err.to_string().starts_with("program failed to link"));
    }

    #[test]
    fn mismatched_varying_type_fails_to_link() {
        let fs = r#"
            @fragment
            fn fs_main(@location(0) @interpolate(flat) v_color: vec2<i32>) -> @location(0) vec4<f32> {
                return vec4<f32>(vec2<f32>(v_color), 0.0, 1.0);
            }
        "#;
        let err = ShaderCompiler::new()
            .link(
                compile(sources::CUBE_VERTEX, ShaderStage::Vertex),
                compile(fs, ShaderStage::Fragment),
            )
            .expect_err("vec4<f32> output cannot feed a vec2<i32> input");

        assert!(err.log.contains("`v_color` at @location(0) is vec2<i32>"));
        assert!(err.log.contains("writes vec4<f32>"));
    }

    #[test]
    fn mismatched_interpolation_fails_to_link() {
        let fs = r#"
            @fragment
            fn fs_main(@location(0) @interpolate(linear) v_color: vec4<f32>) -> @location(0) vec4<f32> {
                return v_color;
            }
        "#;
        let err = ShaderCompiler::new()
            .link(
                compile(sources::CUBE_VERTEX, ShaderStage::Vertex),
                compile(fs, ShaderStage::Fragment),
            )
            .expect_err("linear input against a perspective output");

        assert!(err.log.contains("interpolated as"));
    }

    #[test]
    fn explicit_default_interpolation_links() {
        let fs = r#"
            @fragment
            fn fs_main(@location(0) @interpolate(perspective, center) v_color: vec4<f32>) -> @location(0) vec4<f32> {
                return v_color;
            }
        "#;
        ShaderCompiler::new()
            .link(
                compile(sources::CUBE_VERTEX, ShaderStage::Vertex),
                compile(fs, ShaderStage::Fragment),
            )
            .expect("spelled-out defaults match the implicit ones");
    }

    #[test]
    fn non_zero_group_fails_to_link() {
        let vs = r#"
            @group(1) @binding(0) var<uniform> u_model: mat4x4<f32>;

            @vertex
            fn vs_main(@location(0) a_position: vec4<f32>) -> @builtin(position) vec4<f32> {
                return u_model * a_position;
            }
        "#;
        let err = ShaderCompiler::new()
            .link(compile(vs, ShaderStage::Vertex), compile(PLAIN_FS, ShaderStage::Fragment))
            .expect_err("group 1 is rejected");
        assert!(err.log.contains("@group(1)"));
    }
}
