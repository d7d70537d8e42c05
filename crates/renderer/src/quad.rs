use glow::HasContext;

use crate::error::{RenderError, Result};

/// Corner positions of a screen-filling quad, ordered for a triangle strip.
pub const QUAD_VERTICES: [f32; 8] = [-1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0, -1.0];

/// Vertices drawn per quad.
pub const QUAD_VERTEX_COUNT: i32 = (QUAD_VERTICES.len() / 2) as i32;

/// Vertex array holding the fullscreen quad at attribute 0.
///
/// The upload buffer is deleted as soon as the attribute pointer is recorded;
/// the vertex array keeps the buffer storage referenced.
pub(crate) struct QuadGeometry<'gl> {
    gl: &'gl glow::Context,
    vertex_array: glow::VertexArray,
}

impl<'gl> QuadGeometry<'gl> {
    pub(crate) fn new(gl: &'gl glow::Context) -> Result<Self> {
        // SAFETY: the context `gl` was loaded from is current on this thread.
        let vertex_array =
            unsafe { gl.create_vertex_array() }.map_err(|message| RenderError::Allocation {
                kind: "vertex array",
                message,
            })?;
        let geometry = Self { gl, vertex_array };

        unsafe {
            gl.bind_vertex_array(Some(vertex_array));

            let buffer = match gl.create_buffer() {
                Ok(buffer) => buffer,
                Err(message) => {
                    gl.bind_vertex_array(None);
                    return Err(RenderError::Allocation {
                        kind: "buffer",
                        message,
                    });
                }
            };
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&QUAD_VERTICES),
                glow::STATIC_DRAW,
            );

            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, 0, 0);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.delete_buffer(buffer);
        }

        tracing::debug!(
            bytes = std::mem::size_of_val(&QUAD_VERTICES),
            "uploaded fullscreen quad"
        );
        Ok(geometry)
    }

    pub(crate) fn raw(&self) -> glow::VertexArray {
        self.vertex_array
    }

    pub(crate) fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vertex_array));
            self.gl.draw_arrays(glow::TRIANGLE_STRIP, 0, QUAD_VERTEX_COUNT);
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for QuadGeometry<'_> {
    fn drop(&mut self) {
        unsafe { self.gl.delete_vertex_array(self.vertex_array) }
    }
}
