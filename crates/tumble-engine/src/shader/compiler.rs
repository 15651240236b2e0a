use std::fmt;

use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};

use super::error::ShaderCompileError;
use super::program::{link_program, Program};
use super::ProgramLinkError;

/// Pipeline stage a shader is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// A validated WGSL shader stage.
///
/// Holds the parsed module and its validation info; GPU objects are created from
/// it by [`GpuProgram`](super::GpuProgram) once linked.
pub struct Shader {
    pub(crate) stage: ShaderStage,
    pub(crate) source: String,
    pub(crate) module: naga::Module,
    pub(crate) info: ModuleInfo,
    /// Index into `module.entry_points`.
    pub(crate) entry_point: usize,
}

impl Shader {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entry_point(&self) -> &str {
        &self.module.entry_points[self.entry_point].name
    }

    pub(crate) fn entry(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_point]
    }

    /// Drops the compiled stage.
    pub fn release(self) {
        log::debug!("{} shader `{}` released", self.stage, self.entry_point());
    }
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("stage", &self.stage)
            .field("entry_point", &self.entry_point())
            .finish_non_exhaustive()
    }
}

/// Compiles WGSL stages and links them into programs.
///
/// Every failure is reported with the full diagnostic text; nothing returns a
/// half-valid handle.
pub struct ShaderCompiler {
    validator: Validator,
}

impl ShaderCompiler {
    pub fn new() -> Self {
        Self {
            validator: Validator::new(ValidationFlags::all(), Capabilities::empty()),
        }
    }

    /// Parses and validates `source` as a `stage` shader.
    ///
    /// The module must declare at least one entry point for `stage`; the first
    /// one is used.
    pub fn compile(&mut self, source: &str, stage: ShaderStage) -> Result<Shader, ShaderCompileError> {
        let module = naga::front::wgsl::parse_str(source)
            .map_err(|e| ShaderCompileError::new(stage, e.emit_to_string(source)))?;

        let info = self
            .validator
            .validate(&module)
            .map_err(|e| ShaderCompileError::new(stage, e.emit_to_string(source)))?;

        let entry_point = module
            .entry_points
            .iter()
            .position(|ep| ep.stage == stage.to_naga())
            .ok_or_else(|| ShaderCompileError::new(stage, format!("no @{stage} entry point")))?;

        log::debug!(
            "compiled {stage} shader, entry point `{}`",
            module.entry_points[entry_point].name
        );

        Ok(Shader {
            stage,
            source: source.to_owned(),
            module,
            info,
            entry_point,
        })
    }

    /// Links a vertex and a fragment stage into a program.
    pub fn link(&self, vertex: Shader, fragment: Shader) -> Result<Program, ProgramLinkError> {
        let program = link_program(vertex, fragment)?;
        log::info!(
            "program linked: {} attribute(s), {} uniform(s)",
            program.attributes().len(),
            program.uniforms().len()
        );
        Ok(program)
    }
}

impl Default for ShaderCompiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::sources;

    #[test]
    fn compiles_cube_stages() {
        let mut compiler = ShaderCompiler::new();
        let vs = compiler
            .compile(sources::CUBE_VERTEX, ShaderStage::Vertex)
            .expect("cube vertex shader compiles");
        let fs = compiler
            .compile(sources::CUBE_FRAGMENT, ShaderStage::Fragment)
            .expect("cube fragment shader compiles");

        assert_eq!(vs.entry_point(), "vs_main");
        assert_eq!(fs.entry_point(), "fs_main");
    }

    #[test]
    fn syntax_error_is_reported() {
        let broken = "@vertex fn vs_main( -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }";
        let err = ShaderCompiler::new()
            .compile(broken, ShaderStage::Vertex)
            .expect_err("broken source must not compile");

        assert_eq!(err.stage, ShaderStage::Vertex);
        assert!(!err.log.is_empty());
    }

    #[test]
    fn type_error_is_reported() {
        let src = r#"
            @vertex
            fn vs_main() -> @builtin(position) vec4<f32> {
                let x: f32 = true;
                return vec4<f32>(x);
            }
        "#;
        let err = ShaderCompiler::new()
            .compile(src, ShaderStage::Vertex)
            .expect_err("type mismatch must not compile");
        assert!(err.to_string().starts_with("vertex shader failed to compile"));
    }

    #[test]
    fn missing_entry_point_for_stage() {
        let err = ShaderCompiler::new()
            .compile(sources::CUBE_FRAGMENT, ShaderStage::Vertex)
            .expect_err("fragment-only module has no vertex entry point");
        assert!(err.log.contains("no @vertex entry point"));
    }
}
