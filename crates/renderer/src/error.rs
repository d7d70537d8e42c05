use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::ShaderStage;

/// Failures raised while constructing GL wrappers.
///
/// Every variant is terminal for the constructor that returned it: no
/// partially initialised object is handed back, and any driver object the
/// constructor had already allocated has been released.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read shader source {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `log` is the driver's info log, unmodified.
    #[error("failed to compile {stage} shader {origin}:\n{log}")]
    Compile {
        stage: ShaderStage,
        origin: String,
        log: String,
    },

    #[error("failed to link program:\n{log}")]
    Link { log: String },

    #[error("driver refused to allocate a {kind} object: {message}")]
    Allocation { kind: &'static str, message: String },

    #[error(transparent)]
    Init(#[from] InitError),
}

/// Ordered failure points of [`crate::Window`] construction.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("windowing backend initialization failed: {0}")]
    Backend(String),

    #[error("windowing backend is already driving another window on this thread")]
    BackendBusy,

    #[error("window creation failed: {0}")]
    Window(String),

    #[error("OpenGL context creation failed: {0}")]
    Context(String),

    #[error("OpenGL surface creation failed: {0}")]
    Surface(String),

    #[error("glGetError() returned code {0:#06x} after context creation")]
    GlError(u32),

    #[error("OpenGL function loader initialization failed: {0}")]
    Loader(String),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_carries_log_verbatim() {
        let log = "0:3(1): error: syntax error, unexpected '}'\n".to_string();
        let err = RenderError::Compile {
            stage: ShaderStage::Fragment,
            origin: "broken.frag".into(),
            log: log.clone(),
        };
        match &err {
            RenderError::Compile { log: carried, .. } => assert_eq!(carried, &log),
            other => panic!("unexpected error {other:?}"),
        }
        let rendered = err.to_string();
        assert!(rendered.starts_with("failed to compile fragment shader broken.frag"));
        assert!(rendered.ends_with(&log));
    }

    #[test]
    fn io_error_names_the_path() {
        let err = RenderError::Io {
            path: PathBuf::from("/missing/quad.vert"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read shader source /missing/quad.vert: no such file"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn init_errors_convert_transparently() {
        let err: RenderError = InitError::GlError(0x0502).into();
        assert_eq!(
            err.to_string(),
            "glGetError() returned code 0x0502 after context creation"
        );
        assert!(matches!(err, RenderError::Init(InitError::GlError(0x0502))));
    }
}
