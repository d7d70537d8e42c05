//! Lifecycle wrappers around an OpenGL context for the volview viewer.
//!
//! Each wrapper owns exactly one driver object and releases it on drop:
//!
//! ```text
//!   Window ──gl()──▶ Shader ──▶ Program ──┐
//!     │                                   ├──▶ Renderer::update()
//!     └──────────── borrowed by ──────────┘
//!   loop { renderer.update(); if !window.update() { break } }
//! ```
//!
//! `Window` opens the native window, makes its context current, and pumps
//! events once per frame. `Shader` and `Program` borrow the window's GL
//! function table, so the borrow checker keeps them from outliving the
//! context. `Renderer` holds the programs and the fullscreen quad used to put
//! an image on screen.

mod debug;
mod error;
mod platform;
mod program;
mod quad;
mod renderer;
mod shader;
mod types;
mod window;

pub use debug::{
    is_reported, severity_name, source_name, type_name, DebugMessage, IGNORED_MESSAGE_IDS,
};
pub use error::{InitError, RenderError, Result};
pub use program::Program;
pub use quad::{QUAD_VERTEX_COUNT, QUAD_VERTICES};
pub use renderer::{
    default_shader_dir, Renderer, COLOR_CORRECTION_FRAGMENT, PASSTHROUGH_FRAGMENT,
    PASSTHROUGH_VERTEX,
};
pub use shader::Shader;
pub use types::{Dims, ShaderStage, WindowConfig};
pub use window::Window;

/// Re-exported so callers can name GL handle types and issue extra calls.
pub use glow;
