use crate::{
    error::Error,
    platform::{Platform, WindowConfig},
};

/// A native window with a fixed size and title.
///
/// Owns the platform handle exclusively; the handle is released when the
/// window is dropped.
#[derive(Debug)]
pub struct Window<H> {
    handle: H,
    config: WindowConfig,
}

impl<H> Window<H> {
    /// Creates the window through `platform`.
    ///
    /// On failure the platform is terminated, as nothing else can use it.
    ///
    /// # Errors
    /// Returns [`Error::Window`] if the platform cannot create a window.
    pub fn init<P>(platform: &mut P, config: WindowConfig) -> Result<Self, Error>
    where
        P: Platform<Handle = H>,
    {
        match platform.create_window(&config) {
            Ok(handle) => {
                tracing::info!(
                    width = config.width,
                    height = config.height,
                    title = %config.title,
                    "window created"
                );
                Ok(Self { handle, config })
            },
            Err(reason) => {
                tracing::error!(%reason, "Failed to create window");
                platform.terminate();
                Err(Error::window_creation_failed(&reason))
            },
        }
    }

    /// The native handle.
    #[must_use]
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// The native handle, mutably.
    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    /// Replaces the native handle, returning the previous one.
    pub fn set_handle(&mut self, handle: H) -> H {
        std::mem::replace(&mut self.handle, handle)
    }

    /// The parameters the window was created with.
    #[must_use]
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }
}
