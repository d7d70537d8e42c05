use std::path::{Path, PathBuf};

use glow::HasContext;

use crate::error::Result;
use crate::program::Program;
use crate::quad::QuadGeometry;
use crate::window::Window;

pub const PASSTHROUGH_VERTEX: &str = "quad_passthrough.vert";
pub const PASSTHROUGH_FRAGMENT: &str = "quad_passthrough.frag";
pub const COLOR_CORRECTION_FRAGMENT: &str = "color_correction.frag";

/// Directory holding the GLSL sources shipped with this crate.
pub fn default_shader_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"))
}

/// Draws into a [`Window`] it borrows; the window must outlive it.
///
/// Construction builds the window-draw and color-correction programs from
/// `shader_dir` and uploads the static fullscreen quad.
pub struct Renderer<'w> {
    window: &'w Window,
    window_draw: Program<'w>,
    color_correction: Program<'w>,
    quad: QuadGeometry<'w>,
}

impl<'w> Renderer<'w> {
    pub fn new(window: &'w Window, shader_dir: impl AsRef<Path>) -> Result<Self> {
        let shader_dir = shader_dir.as_ref();
        let gl = window.gl();
        let vertex = shader_dir.join(PASSTHROUGH_VERTEX);

        let color_correction =
            Program::from_files(gl, &vertex, shader_dir.join(COLOR_CORRECTION_FRAGMENT))?;
        let window_draw = Program::from_files(gl, &vertex, shader_dir.join(PASSTHROUGH_FRAGMENT))?;
        let quad = QuadGeometry::new(gl)?;

        tracing::debug!(shaders = %shader_dir.display(), "renderer ready");
        Ok(Self {
            window,
            window_draw,
            color_correction,
            quad,
        })
    }

    /// Records one frame: fills the framebuffer with the window-draw program
    /// over the fullscreen quad. Presentation happens in [`Window::update`].
    pub fn update(&mut self) {
        let dims = self.window.framebuffer_dims();
        if dims.is_empty() {
            return;
        }
        let gl = self.window.gl();
        unsafe {
            gl.viewport(0, 0, dims.width as i32, dims.height as i32);
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
        self.window_draw.begin_use();
        self.quad.draw();
        self.window_draw.end_use();
    }

    pub fn window_draw_program(&self) -> &Program<'w> {
        &self.window_draw
    }

    /// Built alongside the window-draw program; not used by [`Renderer::update`] yet.
    pub fn color_correction_program(&self) -> &Program<'w> {
        &self.color_correction
    }

    /// Vertex array holding the fullscreen quad.
    pub fn quad_vertex_array(&self) -> glow::VertexArray {
        self.quad.raw()
    }
}
