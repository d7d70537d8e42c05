use std::path::Path;

use glow::HasContext;

use crate::error::{RenderError, Result};
use crate::shader::Shader;
use crate::types::ShaderStage;

/// A linked GL program.
///
/// Shader stages are attached, linked and detached again during
/// construction; the program does not keep them. A link failure deletes the
/// program object before the error is returned.
pub struct Program<'gl> {
    gl: &'gl glow::Context,
    raw: glow::Program,
}

impl<'gl> Program<'gl> {
    /// Compiles a vertex and a fragment stage from disk and links them.
    pub fn from_files(
        gl: &'gl glow::Context,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let stages = [
            Shader::from_file(gl, vertex_path, ShaderStage::Vertex)?,
            Shader::from_file(gl, fragment_path, ShaderStage::Fragment)?,
        ];
        Self::from_shaders(gl, &stages)
    }

    /// Links already compiled stages, in order.
    pub fn from_shaders(gl: &'gl glow::Context, shaders: &[Shader<'_>]) -> Result<Self> {
        if shaders.is_empty() {
            return Err(RenderError::Link {
                log: "program requires at least one shader stage".to_string(),
            });
        }

        // SAFETY: the context `gl` was loaded from is current on this thread.
        let raw = unsafe { gl.create_program() }.map_err(|message| RenderError::Allocation {
            kind: "program",
            message,
        })?;
        let program = Self { gl, raw };

        unsafe {
            for shader in shaders {
                gl.attach_shader(raw, shader.raw());
            }
            gl.link_program(raw);
            for shader in shaders {
                gl.detach_shader(raw, shader.raw());
            }

            if !gl.get_program_link_status(raw) {
                let log = gl.get_program_info_log(raw);
                tracing::error!(stages = shaders.len(), "program link failed:\n{log}");
                return Err(RenderError::Link { log });
            }
        }

        tracing::debug!(stages = shaders.len(), "linked program");
        Ok(program)
    }

    /// Binds this program for subsequent draw calls.
    ///
    /// Pair every call with [`Program::end_use`] before binding another
    /// program; overlapping use is not detected.
    pub fn begin_use(&self) {
        unsafe { self.gl.use_program(Some(self.raw)) }
    }

    /// Unbinds whatever program is current.
    pub fn end_use(&self) {
        unsafe { self.gl.use_program(None) }
    }

    pub fn raw(&self) -> glow::Program {
        self.raw
    }
}

impl Drop for Program<'_> {
    fn drop(&mut self) {
        unsafe { self.gl.delete_program(self.raw) }
    }
}

impl std::fmt::Debug for Program<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program").field("raw", &self.raw).finish()
    }
}
