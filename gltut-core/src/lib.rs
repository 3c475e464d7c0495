//! OpenGL 3.3 core bootstrap: one window, one shader program, one triangle.
//!
//! The crate is independent of any windowing library. [`Platform`] covers
//! window creation and input, [`Gpu`] covers the GL calls and is implemented
//! for [`glow::Context`]. [`Game`] sequences both:
//!
//! ```no_run
//! # fn demo<P: gltut_core::Platform>(platform: P) -> Result<(), gltut_core::Error> {
//! use gltut_core::{Game, GameConfig};
//!
//! let report = Game::init(platform, GameConfig::default())?.run()?;
//! println!("rendered {} frames", report.frames);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod error;
pub mod gl;
mod game;
mod platform;
mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use error::Error;
pub use game::{CLEAR_COLOR, Game, GameConfig, RunReport, ShaderFailurePolicy, ShaderPaths};
pub use gl::{GlState, Gpu, RasterMode, Shader, ShaderStage, ShaderStatus, TriangleMesh};
pub use platform::{
    ContextHints, GlProfile, Key, Platform, PlatformEvent, WindowConfig,
};
pub use window::Window;
