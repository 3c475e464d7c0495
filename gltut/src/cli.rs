use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use gltut_core::{GameConfig, ShaderFailurePolicy, ShaderPaths, WindowConfig};

#[derive(Parser, Debug)]
#[command(
    name = "gltut",
    version,
    about = "Draws a vertex-colored triangle with OpenGL 3.3 core",
    long_about = "Opens a window, builds a shader program from two GLSL files and renders a \
                  static triangle until the window is closed or Escape is pressed. \
                  Press 1 for wireframe, 2 for filled polygons."
)]
pub struct Cli {
    /// Vertex shader source, relative to the working directory
    #[arg(long, default_value = "resources/shaders/Shader.vert", value_name = "PATH")]
    pub vertex_shader: PathBuf,

    /// Fragment shader source, relative to the working directory
    #[arg(long, default_value = "resources/shaders/Shader.frag", value_name = "PATH")]
    pub fragment_shader: PathBuf,

    /// Window width in screen coordinates
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Window height in screen coordinates
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Window title
    #[arg(long, default_value = "OpenGLTut")]
    pub title: String,

    /// Present frames as fast as possible instead of waiting for vsync
    #[arg(long)]
    pub no_vsync: bool,

    /// What to do when the shader program fails to build
    #[arg(long, value_enum, default_value_t = OnShaderError::Abort, value_name = "POLICY")]
    pub on_shader_error: OnShaderError,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnShaderError {
    /// Exit with an error before the first frame
    Abort,
    /// Keep running; frames are cleared but nothing is drawn
    Continue,
}

impl From<OnShaderError> for ShaderFailurePolicy {
    fn from(val: OnShaderError) -> Self {
        match val {
            OnShaderError::Abort => ShaderFailurePolicy::Abort,
            OnShaderError::Continue => ShaderFailurePolicy::Continue,
        }
    }
}

impl Cli {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            window: WindowConfig {
                width: self.width,
                height: self.height,
                title: self.title.clone(),
                vsync: !self.no_vsync,
            },
            shaders: ShaderPaths {
                vertex: self.vertex_shader.clone(),
                fragment: self.fragment_shader.clone(),
            },
            on_shader_failure: self.on_shader_error.into(),
            ..GameConfig::default()
        }
    }
}
