use std::path::PathBuf;

use crate::{
    error::Error,
    gl::{GlState, Gpu, RasterMode, Shader, ShaderStatus, TriangleMesh},
    platform::{ContextHints, Key, Platform, PlatformEvent, WindowConfig},
    window::Window,
};

/// Background color the frame is cleared to.
pub const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];

/// What `run` does when the shader program fails to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderFailurePolicy {
    /// Tear down and return the first build diagnostic.
    #[default]
    Abort,
    /// Keep the window open and clear every frame, drawing nothing.
    Continue,
}

/// Locations of the vertex and fragment shader sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    /// Vertex stage source.
    pub vertex: PathBuf,
    /// Fragment stage source.
    pub fragment: PathBuf,
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("resources/shaders/Shader.vert"),
            fragment: PathBuf::from("resources/shaders/Shader.frag"),
        }
    }
}

/// Everything [`Game`] needs to start up and run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameConfig {
    /// Window size, title and presentation.
    pub window: WindowConfig,
    /// Context version and profile.
    pub hints: ContextHints,
    /// Shader sources, relative to the working directory.
    pub shaders: ShaderPaths,
    /// Failure policy for the shader build.
    pub on_shader_failure: ShaderFailurePolicy,
}

/// Summary of a finished [`Game::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Completed update/render cycles.
    pub frames: u64,
}

/// Owns the platform, the window and the GL function table, and drives the
/// frame loop.
///
/// [`Game::init`] yields an initialized game; [`Game::run`] consumes it and
/// always tears everything down before returning.
pub struct Game<P: Platform> {
    platform: P,
    window: Window<P::Handle>,
    gpu: P::Gpu,
    state: GlState,
    config: GameConfig,
}

impl<P: Platform> Game<P> {
    /// Creates the window, makes its context current and loads GL.
    ///
    /// # Errors
    /// Returns [`Error::Window`] if the window or its context cannot be
    /// created and [`Error::Loader`] if GL cannot be loaded. The platform is
    /// terminated in every failure case.
    pub fn init(mut platform: P, config: GameConfig) -> Result<Self, Error> {
        platform.apply_hints(config.hints);

        let mut window = Window::init(&mut platform, config.window.clone())?;

        let gpu = platform
            .make_context_current(window.handle_mut())
            .and_then(|()| platform.load_gl(window.handle()));
        let gpu = match gpu {
            Ok(gpu) => gpu,
            Err(e) => {
                tracing::error!("{e}");
                platform.terminate();
                return Err(e);
            },
        };

        tracing::info!(
            version = ?config.hints.version,
            profile = ?config.hints.profile,
            "GL context ready"
        );

        Ok(Self {
            platform,
            window,
            gpu,
            state: GlState::new(),
            config,
        })
    }

    /// Builds the shader, uploads the triangle and runs the frame loop until
    /// the window is asked to close.
    ///
    /// # Errors
    /// Returns the first shader diagnostic under
    /// [`ShaderFailurePolicy::Abort`], a [`Error::Resource`] if the triangle
    /// cannot be uploaded, or the error of a failed frame.
    pub fn run(mut self) -> Result<RunReport, Error> {
        let shaders = &self.config.shaders;
        let shader = Shader::from_files(&self.gpu, &shaders.vertex, &shaders.fragment);

        if let ShaderStatus::Failed(diagnostics) = shader.status() {
            match self.config.on_shader_failure {
                ShaderFailurePolicy::Abort => {
                    let err = abort_error(diagnostics);
                    shader.delete(&self.gpu);
                    self.teardown();
                    return Err(err);
                },
                ShaderFailurePolicy::Continue => {
                    tracing::warn!("shader program unusable, frames will be cleared only");
                },
            }
        }

        let mesh = match TriangleMesh::upload(&self.gpu) {
            Ok(mesh) => mesh,
            Err(e) => {
                tracing::error!("{e}");
                shader.delete(&self.gpu);
                self.teardown();
                return Err(e);
            },
        };

        let result = self.frame_loop(&shader, &mesh);

        mesh.delete(&self.gpu);
        shader.delete(&self.gpu);
        self.teardown();

        result
    }

    fn frame_loop(
        &mut self,
        shader: &Shader<P::Gpu>,
        mesh: &TriangleMesh<P::Gpu>,
    ) -> Result<RunReport, Error> {
        let mut frames = 0;
        while !self.platform.should_close(self.window.handle()) {
            self.update();
            if let Err(e) = self.render(shader, mesh) {
                tracing::error!(frames, "{e}");
                return Err(e);
            }
            frames += 1;
        }

        tracing::info!(frames, "frame loop finished");
        Ok(RunReport { frames })
    }

    fn update(&mut self) {
        let platform = &mut self.platform;

        if platform.key_pressed(self.window.handle(), Key::Escape) {
            platform.set_should_close(self.window.handle_mut(), true);
        }

        if platform.key_pressed(self.window.handle(), Key::Num1) {
            self.state.raster_mode(&self.gpu, RasterMode::Wireframe);
        }

        if platform.key_pressed(self.window.handle(), Key::Num2) {
            self.state.raster_mode(&self.gpu, RasterMode::Fill);
        }
    }

    fn render(&mut self, shader: &Shader<P::Gpu>, mesh: &TriangleMesh<P::Gpu>) -> Result<(), Error> {
        self.state.clear_color(&self.gpu, CLEAR_COLOR);
        self.gpu.clear(glow::COLOR_BUFFER_BIT);

        if shader.use_program(&self.gpu) {
            mesh.draw(&self.gpu);
        }

        self.platform.swap_buffers(self.window.handle())?;

        for event in self.platform.poll_events(self.window.handle_mut()) {
            match event {
                PlatformEvent::FramebufferResized { width, height } => {
                    framebuffer_resized(&self.gpu, &mut self.state, width, height);
                },
            }
        }

        Ok(())
    }

    fn teardown(mut self) {
        self.platform.terminate();
        tracing::debug!("windowing layer terminated");
    }
}

/// The error surfaced when a failed shader aborts the run: its first
/// diagnostic, if any was recorded.
fn abort_error(diagnostics: &[Error]) -> Error {
    diagnostics.first().cloned().unwrap_or_else(Error::shader_unusable)
}

fn framebuffer_resized<G: Gpu>(gpu: &G, state: &mut GlState, width: u32, height: u32) {
    tracing::debug!(width, height, "framebuffer resized");
    state.viewport(gpu, 0, 0, width as i32, height as i32);
}
