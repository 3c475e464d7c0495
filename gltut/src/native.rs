//! Desktop windowing through winit, with a glutin-managed GL context.
//!
//! winit drives events through an application handler; polling is mapped
//! onto it by pumping the event loop with a zero timeout once per frame.

use std::{collections::HashSet, num::NonZeroU32, time::Duration};

use glow::HasContext;
use glutin::{
    config::{Config, ConfigTemplateBuilder, GlConfig},
    context::{
        ContextApi, ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext, Version,
    },
    display::{Display, DisplayApiPreference, GetGlDisplay, GlDisplay},
    surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use gltut_core::{ContextHints, Error, GlProfile, Key, Platform, PlatformEvent, WindowConfig};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::WindowId,
};

/// The process-wide winit event loop plus context hints for new windows.
pub struct NativePlatform {
    event_loop: EventLoop<()>,
    hints: ContextHints,
    terminated: bool,
}

/// A winit window with its GL surface and context.
///
/// Fields drop in declaration order: context, then surface, then window.
pub struct NativeWindow {
    gl_context: Option<PossiblyCurrentContext>,
    gl_surface: Option<Surface<WindowSurface>>,
    gl_config: Config,
    window: winit::window::Window,
    vsync: bool,
    keys: HashSet<KeyCode>,
    should_close: bool,
}

impl NativePlatform {
    /// Creates the event loop. Only one may exist per process.
    pub fn new() -> Result<Self, Error> {
        let event_loop = EventLoop::new()
            .map_err(|e| Error::window_creation_failed(&format!("no event loop: {e}")))?;

        Ok(Self {
            event_loop,
            hints: ContextHints::default(),
            terminated: false,
        })
    }
}

impl Platform for NativePlatform {
    type Handle = NativeWindow;
    type Gpu = glow::Context;

    fn apply_hints(&mut self, hints: ContextHints) {
        self.hints = hints;
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<NativeWindow, String> {
        if self.terminated {
            return Err("windowing layer already terminated".to_string());
        }

        let window_attrs = winit::window::Window::default_attributes()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let config_template = ConfigTemplateBuilder::new().with_alpha_size(8);

        // WGL only exposes full pixel formats for a live native window
        #[cfg(target_os = "windows")]
        let (window, config_template, preference) = {
            #[allow(deprecated)]
            let window = self.event_loop.create_window(window_attrs).map_err(|e| e.to_string())?;
            let raw_window = window.window_handle().map_err(|e| e.to_string())?.as_raw();
            let template = config_template.compatible_with_native_window(raw_window);
            (window, template, DisplayApiPreference::Wgl(Some(raw_window)))
        };
        #[cfg(target_os = "macos")]
        let preference = DisplayApiPreference::Cgl;
        #[cfg(all(unix, not(target_os = "macos")))]
        let preference = DisplayApiPreference::Egl;

        let raw_display = self.event_loop.display_handle().map_err(|e| e.to_string())?.as_raw();
        let gl_display =
            unsafe { Display::new(raw_display, preference) }.map_err(|e| e.to_string())?;
        let configs = unsafe { gl_display.find_configs(config_template.build()) }
            .map_err(|e| e.to_string())?;
        let gl_config = most_samples(configs)
            .ok_or_else(|| "no framebuffer config matches the requested attributes".to_string())?;

        #[cfg(not(target_os = "windows"))]
        let window = glutin_winit::finalize_window(&self.event_loop, window_attrs, &gl_config)
            .map_err(|e| e.to_string())?;

        Ok(NativeWindow {
            gl_context: None,
            gl_surface: None,
            gl_config,
            window,
            vsync: config.vsync,
            keys: HashSet::new(),
            should_close: false,
        })
    }

    fn make_context_current(&mut self, handle: &mut NativeWindow) -> Result<(), Error> {
        let raw_window = handle
            .window
            .window_handle()
            .map_err(|e| Error::context_activation_failed(&e.to_string()))?
            .as_raw();

        let (major, minor) = self.hints.version;
        let profile = match self.hints.profile {
            GlProfile::Core => glutin::context::GlProfile::Core,
            GlProfile::Compatibility => glutin::context::GlProfile::Compatibility,
        };
        if self.hints.forward_compatible {
            // CGL only hands out forward-compatible core contexts
            tracing::debug!("forward-compatible context requested");
        }

        let context_attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(profile)
            .build(Some(raw_window));

        let gl_display = handle.gl_config.display();
        let not_current = unsafe { gl_display.create_context(&handle.gl_config, &context_attrs) }
            .map_err(|e| Error::context_activation_failed(&e.to_string()))?;

        let size = handle.window.inner_size();
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Err(Error::context_activation_failed(&format!(
                "window has no drawable area ({}x{})",
                size.width, size.height
            )));
        };

        let surface_attrs =
            SurfaceAttributesBuilder::<WindowSurface>::new().build(raw_window, width, height);
        let gl_surface = unsafe { gl_display.create_window_surface(&handle.gl_config, &surface_attrs) }
            .map_err(|e| Error::context_activation_failed(&e.to_string()))?;

        let gl_context = not_current
            .make_current(&gl_surface)
            .map_err(|e| Error::context_activation_failed(&e.to_string()))?;

        let interval = if handle.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            tracing::warn!(%e, vsync = handle.vsync, "failed to set swap interval");
        }

        handle.gl_context = Some(gl_context);
        handle.gl_surface = Some(gl_surface);
        Ok(())
    }

    fn load_gl(&mut self, handle: &NativeWindow) -> Result<glow::Context, Error> {
        if handle.gl_context.is_none() {
            return Err(Error::gl_loader_failed("no current context"));
        }

        let gl_display = handle.gl_config.display();
        if gl_display.get_proc_address(c"glGetString").is_null() {
            return Err(Error::gl_loader_failed("glGetString is unresolved"));
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| gl_display.get_proc_address(name))
        };

        let version = unsafe { gl.get_parameter_string(glow::VERSION) };
        let renderer = unsafe { gl.get_parameter_string(glow::RENDERER) };
        tracing::info!(%version, %renderer, "GL functions loaded");

        Ok(gl)
    }

    fn should_close(&self, handle: &NativeWindow) -> bool {
        handle.should_close
    }

    fn set_should_close(&mut self, handle: &mut NativeWindow, value: bool) {
        handle.should_close = value;
    }

    fn key_pressed(&self, handle: &NativeWindow, key: Key) -> bool {
        handle.keys.contains(&key_code(key))
    }

    fn swap_buffers(&mut self, handle: &NativeWindow) -> Result<(), Error> {
        let (Some(gl_context), Some(gl_surface)) = (&handle.gl_context, &handle.gl_surface) else {
            return Err(Error::swap_buffers_failed("no GL surface"));
        };

        gl_surface
            .swap_buffers(gl_context)
            .map_err(|e| Error::swap_buffers_failed(&e.to_string()))
    }

    fn poll_events(&mut self, handle: &mut NativeWindow) -> Vec<PlatformEvent> {
        let mut pump = EventPump { window: handle, events: Vec::new() };
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut pump);
        let events = pump.events;

        if let PumpStatus::Exit(code) = status {
            tracing::debug!(code, "event loop exited");
            handle.should_close = true;
        }

        events
    }

    fn terminate(&mut self) {
        self.terminated = true;
        tracing::debug!("native platform terminated");
    }
}

impl NativeWindow {
    fn resize_surface(&self, size: PhysicalSize<u32>) {
        let (Some(gl_context), Some(gl_surface)) = (&self.gl_context, &self.gl_surface) else {
            return;
        };

        if let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            gl_surface.resize(gl_context, width, height);
        }
    }
}

/// Collects one pump's worth of events into the window state.
struct EventPump<'a> {
    window: &'a mut NativeWindow,
    events: Vec<PlatformEvent>,
}

impl ApplicationHandler for EventPump<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if window_id != self.window.window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.window.should_close = true,
            WindowEvent::Resized(size) => {
                self.window.resize_surface(size);
                self.events.push(PlatformEvent::FramebufferResized {
                    width: size.width,
                    height: size.height,
                });
            },
            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, .. },
                ..
            } => match state {
                ElementState::Pressed => {
                    self.window.keys.insert(code);
                },
                ElementState::Released => {
                    self.window.keys.remove(&code);
                },
            },
            // releases are not delivered to unfocused windows
            WindowEvent::Focused(false) => self.window.keys.clear(),
            _ => {},
        }
    }
}

/// Picks the config with the most multisample buffers, keeping the first on ties.
fn most_samples<C: GlConfig>(configs: impl Iterator<Item = C>) -> Option<C> {
    configs.reduce(|best, config| {
        if config.num_samples() > best.num_samples() { config } else { best }
    })
}

fn key_code(key: Key) -> KeyCode {
    match key {
        Key::Escape => KeyCode::Escape,
        Key::Num1 => KeyCode::Digit1,
        Key::Num2 => KeyCode::Digit2,
    }
}
