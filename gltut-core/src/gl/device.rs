//! The slice of the GL driver this crate talks to.
//!
//! [`Gpu`] mirrors the subset of [`glow::HasContext`] used by the shader,
//! mesh and frame loop, which keeps the rest of the crate testable against
//! a recording double. The `glow::Context` implementation forwards each call
//! verbatim.
//!
//! All methods must be called from the thread that owns the current GL
//! context. The windowing platform makes the context current before the
//! function table is loaded, and nothing in this crate leaves that thread.

use std::fmt::Debug;

use glow::HasContext;

use super::buffer::buffer_upload_f32;

/// Programmable pipeline stage of a shader object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Per-vertex stage.
    Vertex,
    /// Per-fragment stage.
    Fragment,
}

impl ShaderStage {
    /// Upper-case tag used in diagnostics, e.g. `VERTEX::COMPILATION_FAILED`.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Vertex => "VERTEX",
            Self::Fragment => "FRAGMENT",
        }
    }
}

impl From<ShaderStage> for u32 {
    fn from(val: ShaderStage) -> Self {
        use ShaderStage::*;

        match val {
            Vertex => glow::VERTEX_SHADER,
            Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

/// Graphics driver calls issued by the bootstrap.
///
/// Enum-like parameters (`target`, `mode`, `mask`, ...) take the raw GL
/// constants from [`glow`].
pub trait Gpu {
    /// Shader object handle.
    type Shader: Copy + Debug;
    /// Program object handle.
    type Program: Copy + Debug;
    /// Buffer object handle.
    type Buffer: Copy + Debug;
    /// Vertex array object handle.
    type VertexArray: Copy + Debug;
    /// Resolved uniform location.
    type UniformLocation: Debug;

    // shaders and programs
    /// Creates a shader object for `stage`.
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    /// Replaces the GLSL source of `shader`.
    fn shader_source(&self, shader: Self::Shader, source: &str);
    /// Compiles the source attached to `shader`.
    fn compile_shader(&self, shader: Self::Shader);
    /// Whether the last compile of `shader` succeeded.
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    /// Compiler output for `shader`.
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    /// Flags `shader` for deletion.
    fn delete_shader(&self, shader: Self::Shader);
    /// Creates an empty program object.
    fn create_program(&self) -> Result<Self::Program, String>;
    /// Attaches a compiled stage to `program`.
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// Links the stages attached to `program`.
    fn link_program(&self, program: Self::Program);
    /// Whether the last link of `program` succeeded.
    fn program_link_status(&self, program: Self::Program) -> bool;
    /// Linker output for `program`.
    fn program_info_log(&self, program: Self::Program) -> String;
    /// Installs `program` for drawing, or unbinds with `None`.
    fn use_program(&self, program: Option<Self::Program>);
    /// Flags `program` for deletion.
    fn delete_program(&self, program: Self::Program);

    // uniforms
    /// Looks up a uniform by name; `None` when the linker dropped or never saw it.
    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;
    /// Sets an `int` (or `bool`) uniform on the program in use.
    fn uniform_1_i32(&self, location: Option<&Self::UniformLocation>, value: i32);
    /// Sets a `float` uniform on the program in use.
    fn uniform_1_f32(&self, location: Option<&Self::UniformLocation>, value: f32);

    // vertex data
    /// Creates a vertex array object.
    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    /// Binds `vertex_array`, or unbinds with `None`.
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    /// Deletes `vertex_array`.
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);
    /// Creates a buffer object.
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    /// Binds `buffer` at `target`, or unbinds with `None`.
    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>);
    /// Uploads `data` to the buffer bound at `target`.
    fn buffer_data_f32(&self, target: u32, data: &[f32], usage: u32);
    /// Deletes `buffer`.
    fn delete_buffer(&self, buffer: Self::Buffer);
    /// Float attribute layout for the bound array buffer; `stride` and
    /// `offset` are in bytes.
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32);
    /// Enables the vertex attribute at `index`.
    fn enable_vertex_attrib_array(&self, index: u32);

    // framebuffer
    /// Sets the color used by color-buffer clears.
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    /// Clears the buffers selected by `mask`.
    fn clear(&self, mask: u32);
    /// Draws `count` vertices from the bound vertex array.
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
    /// Sets how polygons on `face` are rasterized.
    fn polygon_mode(&self, face: u32, mode: u32);
    /// Maps normalized device coordinates onto the framebuffer.
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
}

impl Gpu for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, stage.into()) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) };
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) };
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) };
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) };
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) };
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) };
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) };
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn uniform_1_i32(&self, location: Option<&Self::UniformLocation>, value: i32) {
        unsafe { HasContext::uniform_1_i32(self, location, value) };
    }

    fn uniform_1_f32(&self, location: Option<&Self::UniformLocation>, value: f32) {
        unsafe { HasContext::uniform_1_f32(self, location, value) };
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, vertex_array) };
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, vertex_array) };
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>) {
        unsafe { HasContext::bind_buffer(self, target, buffer) };
    }

    fn buffer_data_f32(&self, target: u32, data: &[f32], usage: u32) {
        buffer_upload_f32(self, target, data, usage);
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) };
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        unsafe {
            HasContext::vertex_attrib_pointer_f32(
                self,
                index,
                size,
                glow::FLOAT,
                false,
                stride,
                offset,
            );
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) };
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { HasContext::clear_color(self, r, g, b, a) };
    }

    fn clear(&self, mask: u32) {
        unsafe { HasContext::clear(self, mask) };
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe { HasContext::draw_arrays(self, mode, first, count) };
    }

    fn polygon_mode(&self, face: u32, mode: u32) {
        unsafe { HasContext::polygon_mode(self, face, mode) };
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) };
    }
}
