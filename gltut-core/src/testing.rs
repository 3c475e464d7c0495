//! Recording GL driver and scripted windowing platform for unit tests.

use std::{
    cell::{Ref, RefCell},
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use crate::{
    error::Error,
    gl::{Gpu, ShaderStage},
    platform::{ContextHints, Key, Platform, PlatformEvent, WindowConfig},
};

pub(crate) const VERTEX_SOURCE: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aColor;

out vec3 ourColor;

void main()
{
    gl_Position = vec4(aPos, 1.0);
    ourColor = aColor;
}
";

pub(crate) const FRAGMENT_SOURCE: &str = "#version 330 core
out vec4 FragColor;
in vec3 ourColor;

uniform float uAlpha;
uniform int uMode;
uniform bool uEnabled;

void main()
{
    FragColor = vec4(ourColor, uAlpha);
}
";

/// Ordered log of driver and platform calls, shared between both doubles.
pub(crate) type Journal = Rc<RefCell<Vec<String>>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum UniformValue {
    Int(i32),
    Float(f32),
}

#[derive(Debug)]
pub(crate) struct FakeShader {
    pub stage: ShaderStage,
    pub source: String,
    pub compiled: bool,
    pub info_log: String,
}

#[derive(Debug, Default)]
pub(crate) struct FakeProgram {
    pub attached: Vec<u32>,
    pub linked: bool,
    pub info_log: String,
    pub uniforms: HashMap<String, UniformValue>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FakeAttribute {
    pub size: i32,
    pub stride: i32,
    pub offset: i32,
    pub buffer: Option<u32>,
    pub enabled: bool,
}

#[derive(Debug, Default)]
pub(crate) struct FakeVertexArray {
    pub attributes: BTreeMap<u32, FakeAttribute>,
}

/// A draw call together with the vertex data the driver would have fetched.
#[derive(Debug)]
pub(crate) struct DrawCall {
    pub mode: u32,
    pub program: Option<u32>,
    pub vertex_array: Option<u32>,
    pub polygon_mode: u32,
    /// Per vertex: attribute location -> components.
    pub vertices: Vec<BTreeMap<u32, Vec<f32>>>,
}

#[derive(Debug)]
pub(crate) struct FakeUniform {
    program: u32,
    name: String,
}

#[derive(Debug)]
pub(crate) struct GpuRecord {
    next_id: u32,
    compile_errors: HashMap<ShaderStage, String>,
    link_error: Option<String>,
    buffer_error: Option<String>,

    pub shaders: BTreeMap<u32, FakeShader>,
    pub programs: BTreeMap<u32, FakeProgram>,
    pub buffers: BTreeMap<u32, Vec<f32>>,
    pub vertex_arrays: BTreeMap<u32, FakeVertexArray>,
    pub deleted_shaders: Vec<u32>,
    pub deleted_programs: Vec<u32>,
    pub deleted_buffers: Vec<u32>,
    pub deleted_vertex_arrays: Vec<u32>,

    pub current_program: Option<u32>,
    pub bound_vertex_array: Option<u32>,
    pub bound_array_buffer: Option<u32>,
    pub clear_color: [f32; 4],
    pub clears: u32,
    pub polygon_mode: u32,
    pub viewport: [i32; 4],
    pub ignored_uniform_writes: u32,
    pub gl_errors: Vec<&'static str>,
    pub draws: Vec<DrawCall>,
}

impl Default for GpuRecord {
    fn default() -> Self {
        Self {
            next_id: 0,
            compile_errors: HashMap::new(),
            link_error: None,
            buffer_error: None,
            shaders: BTreeMap::new(),
            programs: BTreeMap::new(),
            buffers: BTreeMap::new(),
            vertex_arrays: BTreeMap::new(),
            deleted_shaders: Vec::new(),
            deleted_programs: Vec::new(),
            deleted_buffers: Vec::new(),
            deleted_vertex_arrays: Vec::new(),
            current_program: None,
            bound_vertex_array: None,
            bound_array_buffer: None,
            clear_color: [0.0; 4],
            clears: 0,
            polygon_mode: glow::FILL,
            viewport: [0; 4],
            ignored_uniform_writes: 0,
            gl_errors: Vec::new(),
            draws: Vec::new(),
        }
    }
}

impl GpuRecord {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn declares_uniform(&self, program: u32, name: &str) -> bool {
        self.programs[&program]
            .attached
            .iter()
            .filter_map(|id| self.shaders.get(id))
            .flat_map(|shader| shader.source.lines())
            .filter(|line| line.trim_start().starts_with("uniform "))
            .filter_map(|line| line.split_whitespace().last())
            .any(|token| token.trim_end_matches(';') == name)
    }

    fn fetch_vertices(&self, first: i32, count: i32) -> Vec<BTreeMap<u32, Vec<f32>>> {
        let Some(vao) = self.bound_vertex_array.and_then(|id| self.vertex_arrays.get(&id)) else {
            return Vec::new();
        };

        (first..first + count)
            .map(|i| {
                vao.attributes
                    .iter()
                    .filter(|(_, attr)| attr.enabled)
                    .map(|(&location, attr)| {
                        let data = attr
                            .buffer
                            .and_then(|id| self.buffers.get(&id))
                            .map_or(&[][..], Vec::as_slice);
                        let start = ((attr.offset + i * attr.stride) / 4) as usize;
                        let end = start + attr.size as usize;
                        (location, data.get(start..end).unwrap_or_default().to_vec())
                    })
                    .collect()
            })
            .collect()
    }
}

/// A [`Gpu`] that keeps every object in memory and journals each call.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingGpu {
    record: Rc<RefCell<GpuRecord>>,
    journal: Journal,
}

impl RecordingGpu {
    pub(crate) fn with_compile_error(self, stage: ShaderStage, log: &str) -> Self {
        self.record.borrow_mut().compile_errors.insert(stage, log.to_string());
        self
    }

    pub(crate) fn with_link_error(self, log: &str) -> Self {
        self.record.borrow_mut().link_error = Some(log.to_string());
        self
    }

    pub(crate) fn with_buffer_creation_error(self, reason: &str) -> Self {
        self.record.borrow_mut().buffer_error = Some(reason.to_string());
        self
    }

    pub(crate) fn record(&self) -> Ref<'_, GpuRecord> {
        self.record.borrow()
    }

    pub(crate) fn journal(&self) -> Journal {
        Rc::clone(&self.journal)
    }

    pub(crate) fn calls_named(&self, name: &str) -> usize {
        let entry = format!("gl:{name}");
        self.journal.borrow().iter().filter(|e| **e == entry).count()
    }

    /// Sources of all shader objects, in creation order.
    pub(crate) fn shader_sources(&self) -> Vec<String> {
        self.record().shaders.values().map(|s| s.source.clone()).collect()
    }

    fn log(&self, name: &str) {
        self.journal.borrow_mut().push(format!("gl:{name}"));
    }
}

impl Gpu for RecordingGpu {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = FakeUniform;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        self.log("create_shader");
        let mut record = self.record.borrow_mut();
        let id = record.next_id();
        record.shaders.insert(id, FakeShader {
            stage,
            source: String::new(),
            compiled: false,
            info_log: String::new(),
        });
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.log("shader_source");
        if let Some(s) = self.record.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: u32) {
        self.log("compile_shader");
        let mut guard = self.record.borrow_mut();
        let record = &mut *guard;
        let forced = record
            .shaders
            .get(&shader)
            .and_then(|s| record.compile_errors.get(&s.stage))
            .cloned();

        if let Some(s) = record.shaders.get_mut(&shader) {
            let info_log = match forced {
                Some(log) => log,
                None if !s.source.contains("main") => "0:1(1): error: no entry point".to_string(),
                None => String::new(),
            };
            s.compiled = info_log.is_empty();
            s.info_log = info_log;
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.record().shaders.get(&shader).is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.record()
            .shaders
            .get(&shader)
            .map(|s| s.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        self.log("delete_shader");
        self.record.borrow_mut().deleted_shaders.push(shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        self.log("create_program");
        let mut record = self.record.borrow_mut();
        let id = record.next_id();
        record.programs.insert(id, FakeProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.log("attach_shader");
        if let Some(p) = self.record.borrow_mut().programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn link_program(&self, program: u32) {
        self.log("link_program");
        let mut guard = self.record.borrow_mut();
        let record = &mut *guard;
        let all_compiled = record.programs[&program]
            .attached
            .iter()
            .filter(|&id| record.shaders.get(id).is_some_and(|s| s.compiled))
            .count()
            == 2;

        let info_log = match (&record.link_error, all_compiled) {
            (Some(log), _) => log.clone(),
            (None, false) => "error: linking with uncompiled/unattached shader".to_string(),
            (None, true) => String::new(),
        };

        if let Some(p) = record.programs.get_mut(&program) {
            p.linked = info_log.is_empty();
            p.info_log = info_log;
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.record().programs.get(&program).is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.record()
            .programs
            .get(&program)
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<u32>) {
        self.log("use_program");
        self.record.borrow_mut().current_program = program;
    }

    fn delete_program(&self, program: u32) {
        self.log("delete_program");
        self.record.borrow_mut().deleted_programs.push(program);
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<FakeUniform> {
        self.log("uniform_location");
        let record = self.record();
        let linked = record.programs.get(&program).is_some_and(|p| p.linked);

        (linked && record.declares_uniform(program, name))
            .then(|| FakeUniform { program, name: name.to_string() })
    }

    fn uniform_1_i32(&self, location: Option<&FakeUniform>, value: i32) {
        self.log("uniform_1_i32");
        self.record.borrow_mut().write_uniform(location, UniformValue::Int(value));
    }

    fn uniform_1_f32(&self, location: Option<&FakeUniform>, value: f32) {
        self.log("uniform_1_f32");
        self.record.borrow_mut().write_uniform(location, UniformValue::Float(value));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        self.log("create_vertex_array");
        let mut record = self.record.borrow_mut();
        let id = record.next_id();
        record.vertex_arrays.insert(id, FakeVertexArray::default());
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.log("bind_vertex_array");
        self.record.borrow_mut().bound_vertex_array = vertex_array;
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.log("delete_vertex_array");
        self.record.borrow_mut().deleted_vertex_arrays.push(vertex_array);
    }

    fn create_buffer(&self) -> Result<u32, String> {
        self.log("create_buffer");
        let mut record = self.record.borrow_mut();
        if let Some(reason) = record.buffer_error.clone() {
            return Err(reason);
        }
        let id = record.next_id();
        record.buffers.insert(id, Vec::new());
        Ok(id)
    }

    fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        self.log("bind_buffer");
        if target == glow::ARRAY_BUFFER {
            self.record.borrow_mut().bound_array_buffer = buffer;
        }
    }

    fn buffer_data_f32(&self, target: u32, data: &[f32], _usage: u32) {
        self.log("buffer_data_f32");
        let mut guard = self.record.borrow_mut();
        let record = &mut *guard;
        let bound = (target == glow::ARRAY_BUFFER)
            .then_some(record.bound_array_buffer)
            .flatten();
        match bound.and_then(|id| record.buffers.get_mut(&id)) {
            Some(buffer) => *buffer = data.to_vec(),
            None => record.gl_errors.push("GL_INVALID_OPERATION"),
        }
    }

    fn delete_buffer(&self, buffer: u32) {
        self.log("delete_buffer");
        self.record.borrow_mut().deleted_buffers.push(buffer);
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        self.log("vertex_attrib_pointer_f32");
        let mut guard = self.record.borrow_mut();
        let record = &mut *guard;
        let buffer = record.bound_array_buffer;
        match record
            .bound_vertex_array
            .and_then(|id| record.vertex_arrays.get_mut(&id))
        {
            Some(vao) => {
                let attr = vao.attributes.entry(index).or_default();
                attr.size = size;
                attr.stride = stride;
                attr.offset = offset;
                attr.buffer = buffer;
            },
            None => record.gl_errors.push("GL_INVALID_OPERATION"),
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.log("enable_vertex_attrib_array");
        let mut guard = self.record.borrow_mut();
        let record = &mut *guard;
        if let Some(vao) = record
            .bound_vertex_array
            .and_then(|id| record.vertex_arrays.get_mut(&id))
        {
            vao.attributes.entry(index).or_default().enabled = true;
        }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.log("clear_color");
        self.record.borrow_mut().clear_color = [r, g, b, a];
    }

    fn clear(&self, mask: u32) {
        self.log("clear");
        if mask & glow::COLOR_BUFFER_BIT != 0 {
            self.record.borrow_mut().clears += 1;
        }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.log("draw_arrays");
        let mut record = self.record.borrow_mut();
        let draw = DrawCall {
            mode,
            program: record.current_program,
            vertex_array: record.bound_vertex_array,
            polygon_mode: record.polygon_mode,
            vertices: record.fetch_vertices(first, count),
        };
        record.draws.push(draw);
    }

    fn polygon_mode(&self, face: u32, mode: u32) {
        self.log("polygon_mode");
        let mut record = self.record.borrow_mut();
        if face == glow::FRONT_AND_BACK {
            record.polygon_mode = mode;
        } else {
            // core profile only accepts FRONT_AND_BACK
            record.gl_errors.push("GL_INVALID_ENUM");
        }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.log("viewport");
        self.record.borrow_mut().viewport = [x, y, width, height];
    }
}

impl GpuRecord {
    fn write_uniform(&mut self, location: Option<&FakeUniform>, value: UniformValue) {
        match location {
            None => self.ignored_uniform_writes += 1,
            Some(loc) if self.current_program == Some(loc.program) => {
                if let Some(p) = self.programs.get_mut(&loc.program) {
                    p.uniforms.insert(loc.name.clone(), value);
                }
            },
            Some(_) => self.gl_errors.push("GL_INVALID_OPERATION"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct FakeHandle {
    pub id: u32,
    pub should_close: bool,
    pub context_current: bool,
}

/// Observable platform state, shared with the test after the platform is
/// moved into a game.
#[derive(Debug, Default)]
pub(crate) struct PlatformProbe {
    pub hints: Option<ContextHints>,
    pub created_windows: Vec<WindowConfig>,
    pub terminated: bool,
    /// Number of completed `poll_events` calls.
    pub frame: usize,
}

/// A [`Platform`] driven by a per-frame key script.
///
/// Frame `n` sees the keys in `script[n]`; once the script is exhausted the
/// window reports a close request.
#[derive(Debug, Default)]
pub(crate) struct FakePlatform {
    probe: Rc<RefCell<PlatformProbe>>,
    gpu: RecordingGpu,
    script: Vec<Vec<Key>>,
    resizes: Vec<(usize, u32, u32)>,
    no_display: bool,
    no_loader: bool,
    close_requested: bool,
    swap_error_at: Option<usize>,
    next_id: u32,
}

impl FakePlatform {
    pub(crate) fn without_display(mut self) -> Self {
        self.no_display = true;
        self
    }

    pub(crate) fn without_loader(mut self) -> Self {
        self.no_loader = true;
        self
    }

    pub(crate) fn with_gpu(mut self, gpu: RecordingGpu) -> Self {
        self.gpu = gpu;
        self
    }

    pub(crate) fn with_frames(mut self, script: Vec<Vec<Key>>) -> Self {
        self.script = script;
        self
    }

    /// Windows start with their close flag already set.
    pub(crate) fn with_close_requested(mut self) -> Self {
        self.close_requested = true;
        self
    }

    /// Reports a framebuffer resize while polling events after `frame`.
    pub(crate) fn with_resize_after(mut self, frame: usize, width: u32, height: u32) -> Self {
        self.resizes.push((frame, width, height));
        self
    }

    pub(crate) fn with_swap_error_at(mut self, frame: usize) -> Self {
        self.swap_error_at = Some(frame);
        self
    }

    pub(crate) fn gpu(&self) -> RecordingGpu {
        self.gpu.clone()
    }

    pub(crate) fn probe(&self) -> Ref<'_, PlatformProbe> {
        self.probe.borrow()
    }

    pub(crate) fn shared_probe(&self) -> Rc<RefCell<PlatformProbe>> {
        Rc::clone(&self.probe)
    }

    fn log(&self, name: &str) {
        self.gpu.journal.borrow_mut().push(format!("platform:{name}"));
    }
}

impl Platform for FakePlatform {
    type Handle = FakeHandle;
    type Gpu = RecordingGpu;

    fn apply_hints(&mut self, hints: ContextHints) {
        self.log("apply_hints");
        self.probe.borrow_mut().hints = Some(hints);
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<FakeHandle, String> {
        self.log("create_window");
        if self.no_display || self.probe().terminated {
            return Err("no display available".to_string());
        }

        self.probe.borrow_mut().created_windows.push(config.clone());
        self.next_id += 1;
        Ok(FakeHandle {
            id: self.next_id,
            should_close: self.close_requested,
            context_current: false,
        })
    }

    fn make_context_current(&mut self, handle: &mut FakeHandle) -> Result<(), Error> {
        self.log("make_context_current");
        handle.context_current = true;
        Ok(())
    }

    fn load_gl(&mut self, handle: &FakeHandle) -> Result<RecordingGpu, Error> {
        self.log("load_gl");
        if self.no_loader || !handle.context_current {
            return Err(Error::gl_loader_failed("no current context"));
        }
        Ok(self.gpu.clone())
    }

    fn should_close(&self, handle: &FakeHandle) -> bool {
        self.log("should_close");
        handle.should_close || self.probe().frame >= self.script.len()
    }

    fn set_should_close(&mut self, handle: &mut FakeHandle, value: bool) {
        self.log("set_should_close");
        handle.should_close = value;
    }

    fn key_pressed(&self, _handle: &FakeHandle, key: Key) -> bool {
        self.log("key_pressed");
        self.script
            .get(self.probe().frame)
            .is_some_and(|keys| keys.contains(&key))
    }

    fn swap_buffers(&mut self, _handle: &FakeHandle) -> Result<(), Error> {
        self.log("swap_buffers");
        match self.swap_error_at {
            Some(frame) if frame == self.probe().frame => {
                Err(Error::swap_buffers_failed("surface lost"))
            },
            _ => Ok(()),
        }
    }

    fn poll_events(&mut self, _handle: &mut FakeHandle) -> Vec<PlatformEvent> {
        self.log("poll_events");
        let mut probe = self.probe.borrow_mut();
        let completed = probe.frame;
        probe.frame += 1;

        self.resizes
            .iter()
            .filter(|(frame, ..)| *frame == completed)
            .map(|&(_, width, height)| PlatformEvent::FramebufferResized { width, height })
            .collect()
    }

    fn terminate(&mut self) {
        self.log("terminate");
        self.probe.borrow_mut().terminated = true;
    }
}

/// Position of the first journal entry equal to `entry`.
pub(crate) fn journal_position(journal: &Journal, entry: &str) -> Option<usize> {
    journal.borrow().iter().position(|e| e == entry)
}
