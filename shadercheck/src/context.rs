use std::ffi::{CStr, CString};
use std::num::NonZeroU32;

use glutin::config::{Config, ConfigTemplate, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{Display, DisplayApiPreference, GetGlDisplay, GlDisplay};
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};

use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle};

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

/// A current GL context backed by an invisible window.
pub struct HiddenContext {
    _context: PossiblyCurrentContext,
    // XXX the surface must be dropped before the window.
    _surface: Surface<WindowSurface>,
    _window: Window,
    _event_loop: EventLoop<()>,
}

impl HiddenContext {
    pub fn new(major: u8, minor: u8) -> Result<Self, ContextError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(64, 64)))
            .with_visible(false)
            .with_title("shadercheck");

        let (window, gl_config) = open_window(&event_loop, window_builder)?;
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(window.raw_window_handle()));

        let (width, height): (u32, u32) = window.inner_size().into();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window.raw_window_handle(),
            NonZeroU32::new(width).ok_or(ContextError::ZeroSized)?,
            NonZeroU32::new(height).ok_or(ContextError::ZeroSized)?,
        );

        let surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }?;

        let context = unsafe { gl_display.create_context(&gl_config, &context_attr) }?
            .make_current(&surface)?;

        gl::load_with(|s| match CString::new(s) {
            Ok(name) => gl_display.get_proc_address(name.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        log::info!("OpenGL {}", gl_string(gl::VERSION));
        log::debug!("renderer: {}", gl_string(gl::RENDERER));

        Ok(Self {
            _context: context,
            _surface: surface,
            _window: window,
            _event_loop: event_loop,
        })
    }
}

// WGL needs the window before the display.
#[cfg(windows)]
fn open_window(
    event_loop: &EventLoop<()>,
    builder: WindowBuilder,
) -> Result<(Window, Config), ContextError> {
    let window = builder.build(event_loop)?;
    let handle = window.raw_window_handle();

    let display = unsafe {
        Display::new(
            event_loop.raw_display_handle(),
            DisplayApiPreference::WglThenEgl(Some(handle)),
        )
    }?;

    let template = ConfigTemplateBuilder::new()
        .compatible_with_native_window(handle)
        .build();

    Ok((window, first_config(&display, template)?))
}

// On X11 the window has to be created with the visual of the chosen config.
#[cfg(not(windows))]
fn open_window(
    event_loop: &EventLoop<()>,
    builder: WindowBuilder,
) -> Result<(Window, Config), ContextError> {
    let preference = DisplayApiPreference::GlxThenEgl(Box::new(
        winit::platform::unix::register_xlib_error_hook,
    ));
    let display = unsafe { Display::new(event_loop.raw_display_handle(), preference) }?;

    let config = first_config(&display, ConfigTemplateBuilder::new().build())?;
    let window = glutin_winit::finalize_window(event_loop, builder, &config)?;

    Ok((window, config))
}

fn first_config(display: &Display, template: ConfigTemplate) -> Result<Config, ContextError> {
    let mut configs = unsafe { display.find_configs(template) }?;

    configs.next().ok_or(ContextError::NoConfig)
}

fn gl_string(name: gl::types::GLenum) -> String {
    unsafe {
        let ptr = gl::GetString(name);

        if ptr.is_null() {
            return String::from("unknown");
        }

        CStr::from_ptr(ptr.cast()).to_string_lossy().to_string()
    }
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("could not create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("display offered no matching GL config")]
    NoConfig,
    #[error("window has zero size")]
    ZeroSized,
    #[error(transparent)]
    Gl(#[from] glutin::error::Error),
}
