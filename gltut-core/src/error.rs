//! Error type shared by the window, loader and shader paths.

use std::{io, path::Path};

use crate::gl::ShaderStage;

/// Error categories for window setup, GL loading and shader building.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Native window or GL context creation errors.
    #[error("Window error: {0}")]
    Window(String),

    /// GL function pointer loading errors.
    #[error("Loader error: {0}")]
    Loader(String),

    /// Shader compilation, linking, or program creation errors.
    #[error("Shader error: {0}")]
    Shader(String),

    /// GL resource creation or management errors.
    #[error("Resource error: {0}")]
    Resource(String),

    /// Shader source loading errors.
    #[error("Data error: {0}")]
    Data(String),
}

impl Error {
    // Window errors, also raised by platform implementations
    /// The platform could not create a window.
    pub fn window_creation_failed(detail: &str) -> Self {
        Self::Window(format!("Failed to create window: {detail}"))
    }

    /// The window's GL context could not be created or made current.
    pub fn context_activation_failed(detail: &str) -> Self {
        Self::Window(format!("Failed to make GL context current: {detail}"))
    }

    /// Presenting the back buffer failed.
    pub fn swap_buffers_failed(detail: &str) -> Self {
        Self::Window(format!("Failed to swap buffers: {detail}"))
    }

    // Loader errors
    /// GL entry points could not be resolved.
    pub fn gl_loader_failed(detail: &str) -> Self {
        Self::Loader(format!("Failed to load GL functions: {detail}"))
    }

    // Shader errors
    pub(crate) fn shader_creation_failed(stage: ShaderStage, detail: &str) -> Self {
        Self::Shader(format!("ERROR::SHADER::{}::CREATION_FAILED\n{detail}", stage.tag()))
    }

    pub(crate) fn shader_compilation_failed(stage: ShaderStage, log: &str) -> Self {
        Self::Shader(format!("ERROR::SHADER::{}::COMPILATION_FAILED\n{log}", stage.tag()))
    }

    pub(crate) fn shader_program_creation_failed(detail: &str) -> Self {
        Self::Shader(format!("ERROR::SHADER::PROGRAM::CREATION_FAILED\n{detail}"))
    }

    pub(crate) fn shader_link_failed(log: &str) -> Self {
        Self::Shader(format!("ERROR::SHADER::PROGRAM::LINKING_FAILED\n{log}"))
    }

    pub(crate) fn shader_unusable() -> Self {
        Self::Shader("ERROR::SHADER::PROGRAM::UNUSABLE".to_string())
    }

    // Resource errors
    pub(crate) fn buffer_creation_failed(detail: &str) -> Self {
        Self::Resource(format!("Failed to create vertex buffer: {detail}"))
    }

    pub(crate) fn vertex_array_creation_failed(detail: &str) -> Self {
        Self::Resource(format!("Failed to create vertex array object: {detail}"))
    }

    // Data errors
    pub(crate) fn shader_source_unreadable(path: &Path, err: &io::Error) -> Self {
        Self::Data(format!(
            "ERROR::SHADER::FILE_NOT_SUCCESSFULLY_READ: {}: {err}",
            path.display()
        ))
    }
}
