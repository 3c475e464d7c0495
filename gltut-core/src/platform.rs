//! The windowing layer as an explicit object.
//!
//! A [`Platform`] stands for the process-wide windowing state (event loop,
//! display connection). It is created by the entry point, owned by
//! [`Game`](crate::Game) and handed by reference to
//! [`Window::init`](crate::Window::init); [`Platform::terminate`] ends its
//! lifetime.

use crate::{error::Error, gl::Gpu};

/// OpenGL profile requested for the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlProfile {
    /// Core profile, no deprecated functionality.
    #[default]
    Core,
    /// Compatibility profile.
    Compatibility,
}

/// Context creation hints, applied before the window is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextHints {
    /// Requested `(major, minor)` GL version.
    pub version: (u8, u8),
    /// Requested profile.
    pub profile: GlProfile,
    /// Request a forward-compatible context, required for core profiles on macOS.
    pub forward_compatible: bool,
}

impl Default for ContextHints {
    fn default() -> Self {
        Self {
            version: (3, 3),
            profile: GlProfile::Core,
            forward_compatible: cfg!(target_os = "macos"),
        }
    }
}

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    /// Width in screen coordinates.
    pub width: u32,
    /// Height in screen coordinates.
    pub height: u32,
    /// Title bar text.
    pub title: String,
    /// Wait for vertical sync when presenting.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "OpenGLTut".to_string(),
            vsync: true,
        }
    }
}

/// Keys the frame loop polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Requests the window to close.
    Escape,
    /// Switches to wireframe rasterization.
    Num1,
    /// Switches back to filled rasterization.
    Num2,
}

/// Events drained by [`Platform::poll_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    /// The framebuffer changed size, in pixels.
    FramebufferResized {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
}

/// Window creation, context management and input polling.
pub trait Platform {
    /// Native window handle, owned by [`Window`](crate::Window).
    type Handle;
    /// GL function table produced by [`Platform::load_gl`].
    type Gpu: Gpu;

    /// Records context hints for windows created afterwards.
    fn apply_hints(&mut self, hints: ContextHints);

    /// Creates a window without a shared context.
    ///
    /// # Errors
    /// Returns the platform's reason when no window can be created.
    fn create_window(&mut self, config: &WindowConfig) -> Result<Self::Handle, String>;

    /// Makes the window's GL context current on the calling thread.
    ///
    /// # Errors
    /// Returns [`Error::Window`] if the context cannot be created or bound.
    fn make_context_current(&mut self, handle: &mut Self::Handle) -> Result<(), Error>;

    /// Loads the GL function table for the current context.
    ///
    /// # Errors
    /// Returns [`Error::Loader`] if the entry points cannot be resolved.
    fn load_gl(&mut self, handle: &Self::Handle) -> Result<Self::Gpu, Error>;

    /// Whether the window has been asked to close.
    fn should_close(&self, handle: &Self::Handle) -> bool;

    /// Sets or clears the close request.
    fn set_should_close(&mut self, handle: &mut Self::Handle, value: bool);

    /// Whether `key` is currently held down.
    fn key_pressed(&self, handle: &Self::Handle, key: Key) -> bool;

    /// Presents the back buffer.
    ///
    /// # Errors
    /// Returns [`Error::Window`] if presenting fails.
    fn swap_buffers(&mut self, handle: &Self::Handle) -> Result<(), Error>;

    /// Processes pending window-system events without blocking.
    fn poll_events(&mut self, handle: &mut Self::Handle) -> Vec<PlatformEvent>;

    /// Tears down the windowing layer. Further window creation fails.
    fn terminate(&mut self);
}
