//! Native window plus its OpenGL context.
//!
//! Construction walks a fixed sequence and stops at the first failure:
//! backend → window and config → context → surface → function table →
//! `glGetError` check → version check → optional debug output. Each step maps
//! to one [`InitError`] variant.

use std::cell::{Cell, RefCell};
use std::num::NonZeroU32;
use std::time::Duration;

use glow::HasContext;
use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasRawWindowHandle;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::WindowBuilder;

use crate::debug;
use crate::error::{InitError, Result};
use crate::platform::Platform;
use crate::types::{Dims, WindowConfig};

const MIN_GL_VERSION: (u32, u32) = (3, 3);

/// Window, context and presentation surface.
///
/// The size records are snapshots refreshed by [`Window::update`]. Window
/// dims are logical units, framebuffer dims are physical pixels; the two
/// differ under display scaling.
pub struct Window {
    // Field order is drop order: GL state before the context, the context
    // before its surface, everything before the event loop lease.
    gl: glow::Context,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    window: winit::window::Window,
    platform: RefCell<Platform>,
    window_dims: Cell<Dims>,
    framebuffer_dims: Cell<Dims>,
    close_requested: Cell<bool>,
    debug_output: bool,
}

impl Window {
    /// Opens a debug-enabled, vsynced window.
    pub fn new(dims: Dims, title: &str) -> Result<Self> {
        Self::with_config(WindowConfig::new(dims, title))
    }

    pub fn with_config(config: WindowConfig) -> Result<Self> {
        let platform = Platform::acquire(config.any_thread)?;

        let window_builder = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.dims.width, config.dims.height))
            .with_resizable(true);
        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_builder(Some(window_builder))
            .build(platform.event_loop(), template, |configs| {
                // The picker must return a config. An empty match set is
                // reported as an error by `find_configs` before this runs.
                configs
                    .max_by_key(|candidate| candidate.num_samples())
                    .expect("display offers at least one GL config")
            })
            .map_err(|err| InitError::Window(err.to_string()))?;
        let window =
            window.ok_or_else(|| InitError::Window("display did not create a window".into()))?;

        let gl_display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_debug(config.debug)
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(
                MIN_GL_VERSION.0 as u8,
                MIN_GL_VERSION.1 as u8,
            ))))
            .build(Some(window.raw_window_handle()));
        // SAFETY: the raw window handle outlives the context; both are owned
        // by the returned `Window` and dropped in field order.
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|err| InitError::Context(err.to_string()))?;

        let surface_attributes = window.build_surface_attributes(Default::default());
        let gl_surface =
            unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
                .map_err(|err| InitError::Surface(err.to_string()))?;
        let gl_context = not_current
            .make_current(&gl_surface)
            .map_err(|err| InitError::Context(err.to_string()))?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = gl_surface.set_swap_interval(&gl_context, interval) {
            tracing::warn!(%err, vsync = config.vsync, "failed to set swap interval");
        }

        // SAFETY: the context is current on this thread.
        let mut gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| gl_display.get_proc_address(symbol))
        };

        let code = unsafe { gl.get_error() };
        if code != glow::NO_ERROR {
            return Err(InitError::GlError(code).into());
        }

        let version = gl.version();
        if (version.major, version.minor) < MIN_GL_VERSION {
            return Err(InitError::Loader(format!(
                "OpenGL {}.{} required, driver reports {}.{} {}",
                MIN_GL_VERSION.0,
                MIN_GL_VERSION.1,
                version.major,
                version.minor,
                version.vendor_info
            ))
            .into());
        }

        let debug_output = config.debug && debug::install(&mut gl);

        let scale_factor = window.scale_factor();
        let physical = window.inner_size();
        let window_dims = Dims::from(physical.to_logical::<u32>(scale_factor));
        let framebuffer_dims = Dims::from(physical);
        tracing::debug!(
            title = %config.title,
            window = %window_dims,
            framebuffer = %framebuffer_dims,
            scale_factor,
            debug_output,
            "created window"
        );

        Ok(Self {
            gl,
            gl_context,
            gl_surface,
            window,
            platform: RefCell::new(platform),
            window_dims: Cell::new(window_dims),
            framebuffer_dims: Cell::new(framebuffer_dims),
            close_requested: Cell::new(false),
            debug_output,
        })
    }

    /// Polls pending events, refreshes the size records and presents the
    /// frame. Returns `false` once a close was requested.
    pub fn update(&self) -> bool {
        let own_id = self.window.id();
        let status = self.platform.borrow_mut().event_loop_mut().pump_events(
            Some(Duration::ZERO),
            |event, _target| {
                let Event::WindowEvent { window_id, event } = event else {
                    return;
                };
                if window_id != own_id {
                    return;
                }
                match event {
                    WindowEvent::CloseRequested => self.close_requested.set(true),
                    WindowEvent::Resized(_) => {
                        self.window.resize_surface(&self.gl_surface, &self.gl_context)
                    }
                    _ => {}
                }
            },
        );
        if let PumpStatus::Exit(code) = status {
            tracing::debug!(code, "event loop exited");
            self.close_requested.set(true);
        }

        self.refresh_dims();

        if let Err(err) = self.gl_surface.swap_buffers(&self.gl_context) {
            tracing::warn!(%err, "buffer swap failed");
        }

        !self.close_requested.get()
    }

    /// Marks the window for closing; the next [`Window::update`] returns
    /// `false`.
    pub fn close(&self) {
        self.close_requested.set(true);
    }

    fn refresh_dims(&self) {
        let physical = self.window.inner_size();
        self.framebuffer_dims.set(Dims::from(physical));
        self.window_dims
            .set(Dims::from(physical.to_logical::<u32>(self.window.scale_factor())));
    }

    /// The native window.
    pub fn raw(&self) -> &winit::window::Window {
        &self.window
    }

    /// GL function table for the context owned by this window.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn window_dims(&self) -> Dims {
        self.window_dims.get()
    }

    pub fn framebuffer_dims(&self) -> Dims {
        self.framebuffer_dims.get()
    }

    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    /// Whether the driver debug callback is installed.
    pub fn debug_output_enabled(&self) -> bool {
        self.debug_output
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if self.debug_output {
            // The callback closure lives inside `gl`, which is dropped first.
            unsafe { self.gl.disable(glow::DEBUG_OUTPUT) }
        }
        tracing::debug!("destroying window");
    }
}
