use thiserror::Error;

use super::ShaderStage;

/// A shader stage failed to parse or validate.
///
/// `log` holds the full diagnostic, including the offending source span.
#[derive(Debug, Clone, Error)]
#[error("{stage} shader failed to compile:\n{log}")]
pub struct ShaderCompileError {
    pub stage: ShaderStage,
    pub log: String,
}

impl ShaderCompileError {
    pub(crate) fn new(stage: ShaderStage, log: impl Into<String>) -> Self {
        Self { stage, log: log.into() }
    }
}

/// A vertex/fragment pair could not be linked into a program.
#[derive(Debug, Clone, Error)]
#[error("program failed to link:\n{log}")]
pub struct ProgramLinkError {
    pub log: String,
}

impl ProgramLinkError {
    pub(crate) fn from_problems(problems: &[String]) -> Self {
        Self { log: problems.join("\n") }
    }
}
