use std::fs;
use std::path::Path;

use glow::HasContext;

use crate::error::{RenderError, Result};
use crate::types::ShaderStage;

/// One compiled shader stage.
///
/// The wrapper exists only for successfully compiled objects. The driver
/// object is deleted on drop, including when construction bails out after
/// allocation.
pub struct Shader<'gl> {
    gl: &'gl glow::Context,
    raw: glow::Shader,
    stage: ShaderStage,
}

impl<'gl> Shader<'gl> {
    /// Reads `path` and compiles it as `stage`.
    pub fn from_file(
        gl: &'gl glow::Context,
        path: impl AsRef<Path>,
        stage: ShaderStage,
    ) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| {
            tracing::error!(path = %path.display(), %source, "failed to open shader");
            RenderError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_source(gl, &path.display().to_string(), &source, stage)
    }

    /// Compiles in-memory GLSL. `origin` labels the source in errors and logs.
    pub fn from_source(
        gl: &'gl glow::Context,
        origin: &str,
        source: &str,
        stage: ShaderStage,
    ) -> Result<Self> {
        // SAFETY: every GL call below runs on the thread owning the current
        // context that `gl` was loaded from.
        let raw = unsafe { gl.create_shader(stage.gl_enum()) }.map_err(|message| {
            RenderError::Allocation {
                kind: "shader",
                message,
            }
        })?;
        let shader = Self { gl, raw, stage };

        unsafe {
            gl.shader_source(raw, source);
            gl.compile_shader(raw);
            if !gl.get_shader_compile_status(raw) {
                let log = gl.get_shader_info_log(raw);
                tracing::error!(%stage, origin, "shader compilation failed:\n{log}");
                return Err(RenderError::Compile {
                    stage,
                    origin: origin.to_string(),
                    log,
                });
            }
        }

        tracing::debug!(%stage, origin, "compiled shader");
        Ok(shader)
    }

    pub fn raw(&self) -> glow::Shader {
        self.raw
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl Drop for Shader<'_> {
    fn drop(&mut self) {
        unsafe { self.gl.delete_shader(self.raw) }
    }
}

impl std::fmt::Debug for Shader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shader")
            .field("raw", &self.raw)
            .field("stage", &self.stage)
            .finish()
    }
}
