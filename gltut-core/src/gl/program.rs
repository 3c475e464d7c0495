use std::{fs, path::Path};

use super::{Gpu, ShaderStage};
use crate::error::Error;

/// Outcome of building a [`Shader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderStatus {
    /// Both stages compiled and the program linked.
    Linked,
    /// At least one step failed; diagnostics in the order they occurred.
    Failed(Vec<Error>),
}

/// A vertex/fragment program with an explicit build status.
///
/// Building never fails hard: every failure is logged and recorded in
/// [`ShaderStatus::Failed`], and an unlinked shader refuses to bind or set
/// uniforms. The caller decides whether a failed build is fatal.
pub struct Shader<G: Gpu> {
    program: Option<G::Program>,
    status: ShaderStatus,
}

impl<G: Gpu> Shader<G> {
    /// Reads both source files and builds the program from them.
    ///
    /// Paths are resolved against the working directory. If either file
    /// cannot be read nothing is compiled and the shader is `Failed`.
    pub fn from_files(
        gpu: &G,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Self {
        match (
            read_source(vertex_path.as_ref()),
            read_source(fragment_path.as_ref()),
        ) {
            (Ok(vertex), Ok(fragment)) => Self::from_sources(gpu, &vertex, &fragment),
            (vertex, fragment) => {
                let diagnostics = [vertex.err(), fragment.err()]
                    .into_iter()
                    .flatten()
                    .collect();
                Self::finish(None, diagnostics)
            },
        }
    }

    /// Compiles both stages and links them into a program.
    pub fn from_sources(gpu: &G, vertex_source: &str, fragment_source: &str) -> Self {
        let mut diagnostics = Vec::new();

        // compile shaders
        let vertex = compile_shader(gpu, ShaderStage::Vertex, vertex_source, &mut diagnostics);
        let fragment =
            compile_shader(gpu, ShaderStage::Fragment, fragment_source, &mut diagnostics);

        // attach shaders and link program
        let program = match gpu.create_program() {
            Ok(program) => {
                [vertex, fragment]
                    .into_iter()
                    .flatten()
                    .for_each(|shader| gpu.attach_shader(program, shader));
                gpu.link_program(program);

                if !gpu.program_link_status(program) {
                    diagnostics.push(Error::shader_link_failed(&gpu.program_info_log(program)));
                }
                Some(program)
            },
            Err(e) => {
                diagnostics.push(Error::shader_program_creation_failed(&e));
                None
            },
        };

        // stage objects are not needed once linking was attempted
        [vertex, fragment]
            .into_iter()
            .flatten()
            .for_each(|shader| gpu.delete_shader(shader));

        Self::finish(program, diagnostics)
    }

    fn finish(program: Option<G::Program>, diagnostics: Vec<Error>) -> Self {
        let status = if diagnostics.is_empty() {
            tracing::debug!(?program, "shader program linked");
            ShaderStatus::Linked
        } else {
            for err in &diagnostics {
                tracing::error!("{err}");
            }
            ShaderStatus::Failed(diagnostics)
        };

        Self { program, status }
    }

    /// Build outcome.
    #[must_use]
    pub fn status(&self) -> &ShaderStatus {
        &self.status
    }

    /// Whether the program linked and may be used for drawing.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.status == ShaderStatus::Linked
    }

    /// Diagnostics collected while building; empty when linked.
    #[must_use]
    pub fn diagnostics(&self) -> &[Error] {
        match &self.status {
            ShaderStatus::Linked => &[],
            ShaderStatus::Failed(diagnostics) => diagnostics,
        }
    }

    /// The program handle, if the build succeeded.
    #[must_use]
    pub fn program(&self) -> Option<G::Program> {
        self.program.filter(|_| self.is_linked())
    }

    /// Binds the program for subsequent draw calls.
    ///
    /// Returns `false` without touching GL state when the shader is not
    /// linked.
    pub fn use_program(&self, gpu: &G) -> bool {
        match self.program() {
            Some(program) => {
                gpu.use_program(Some(program));
                true
            },
            None => false,
        }
    }

    /// Sets a `bool` uniform on the currently bound program.
    pub fn set_bool(&self, gpu: &G, name: &str, value: bool) {
        self.set_int(gpu, name, i32::from(value));
    }

    /// Sets an `int` uniform on the currently bound program.
    pub fn set_int(&self, gpu: &G, name: &str, value: i32) {
        if let Some(program) = self.program() {
            let location = gpu.uniform_location(program, name);
            gpu.uniform_1_i32(location.as_ref(), value);
        }
    }

    /// Sets a `float` uniform on the currently bound program.
    pub fn set_float(&self, gpu: &G, name: &str, value: f32) {
        if let Some(program) = self.program() {
            let location = gpu.uniform_location(program, name);
            gpu.uniform_1_f32(location.as_ref(), value);
        }
    }

    /// Releases the program object.
    pub fn delete(self, gpu: &G) {
        if let Some(program) = self.program {
            gpu.delete_program(program);
        }
    }
}

fn read_source(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|e| Error::shader_source_unreadable(path, &e))
}

fn compile_shader<G: Gpu>(
    gpu: &G,
    stage: ShaderStage,
    source: &str,
    diagnostics: &mut Vec<Error>,
) -> Option<G::Shader> {
    let shader = match gpu.create_shader(stage) {
        Ok(shader) => shader,
        Err(e) => {
            diagnostics.push(Error::shader_creation_failed(stage, &e));
            return None;
        },
    };

    gpu.shader_source(shader, source);
    gpu.compile_shader(shader);

    if !gpu.shader_compile_status(shader) {
        diagnostics.push(Error::shader_compilation_failed(stage, &gpu.shader_info_log(shader)));
    }

    Some(shader)
}
