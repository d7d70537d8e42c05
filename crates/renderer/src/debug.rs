//! Driver debug-message reporting (`KHR_debug` / GL 4.3 debug output).
//!
//! The callback installed by [`crate::Window`] decodes the numeric source,
//! type and severity enums into names and forwards each message to `tracing`
//! at a level derived from its severity. A handful of notification ids that
//! drivers emit on every buffer allocation are dropped up front.

use std::fmt;

use glow::HasContext;

/// Message ids that carry no actionable information (buffer placement hints,
/// texture-state notes, shader recompiles).
pub const IGNORED_MESSAGE_IDS: [u32; 4] = [131169, 131185, 131218, 131204];

/// Returns true if a message with `id` should be reported at all.
pub fn is_reported(id: u32) -> bool {
    !IGNORED_MESSAGE_IDS.contains(&id)
}

pub fn source_name(source: u32) -> &'static str {
    match source {
        glow::DEBUG_SOURCE_API => "API",
        glow::DEBUG_SOURCE_WINDOW_SYSTEM => "Window System",
        glow::DEBUG_SOURCE_SHADER_COMPILER => "Shader Compiler",
        glow::DEBUG_SOURCE_THIRD_PARTY => "Third Party",
        glow::DEBUG_SOURCE_APPLICATION => "Application",
        glow::DEBUG_SOURCE_OTHER => "Other",
        _ => "Unknown",
    }
}

pub fn type_name(kind: u32) -> &'static str {
    match kind {
        glow::DEBUG_TYPE_ERROR => "Error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated Behaviour",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined Behaviour",
        glow::DEBUG_TYPE_PORTABILITY => "Portability",
        glow::DEBUG_TYPE_PERFORMANCE => "Performance",
        glow::DEBUG_TYPE_MARKER => "Marker",
        glow::DEBUG_TYPE_PUSH_GROUP => "Push Group",
        glow::DEBUG_TYPE_POP_GROUP => "Pop Group",
        glow::DEBUG_TYPE_OTHER => "Other",
        _ => "Unknown",
    }
}

pub fn severity_name(severity: u32) -> &'static str {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => "high",
        glow::DEBUG_SEVERITY_MEDIUM => "medium",
        glow::DEBUG_SEVERITY_LOW => "low",
        glow::DEBUG_SEVERITY_NOTIFICATION => "notification",
        _ => "unknown",
    }
}

/// One decoded driver message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugMessage<'a> {
    pub source: u32,
    pub kind: u32,
    pub id: u32,
    pub severity: u32,
    pub text: &'a str,
}

impl fmt::Display for DebugMessage<'_> {
    /// Multi-line report, one attribute per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Debug message ({}): {}", self.id, self.text.trim_end())?;
        writeln!(f, "Source: {}", source_name(self.source))?;
        writeln!(f, "Type: {}", type_name(self.kind))?;
        write!(f, "Severity: {}", severity_name(self.severity))
    }
}

/// Callback handed to `glDebugMessageCallback`.
pub(crate) fn report(source: u32, kind: u32, id: u32, severity: u32, text: &str) {
    if !is_reported(id) {
        return;
    }
    let message = DebugMessage {
        source,
        kind,
        id,
        severity,
        text,
    };
    let source = source_name(source);
    let kind = type_name(kind);
    let severity_label = severity_name(severity);
    match severity {
        glow::DEBUG_SEVERITY_HIGH => {
            tracing::error!(id, source, kind, severity = severity_label, "{message}")
        }
        glow::DEBUG_SEVERITY_MEDIUM => {
            tracing::warn!(id, source, kind, severity = severity_label, "{message}")
        }
        glow::DEBUG_SEVERITY_LOW => {
            tracing::info!(id, source, kind, severity = severity_label, "{message}")
        }
        _ => tracing::debug!(id, source, kind, severity = severity_label, "{message}"),
    }
}

/// Enables synchronous debug output if the context was created with the debug
/// flag and the driver exposes the entry points. Returns whether it did.
pub(crate) fn install(gl: &mut glow::Context) -> bool {
    // SAFETY: called with the context current on this thread.
    unsafe {
        let flags = gl.get_parameter_i32(glow::CONTEXT_FLAGS) as u32;
        if flags & glow::CONTEXT_FLAG_DEBUG_BIT == 0 || !gl.supports_debug() {
            return false;
        }
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(report);
        gl.debug_message_control(glow::DONT_CARE, glow::DONT_CARE, glow::DONT_CARE, &[], true);
    }
    true
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn noisy_ids_are_filtered() {
        for id in IGNORED_MESSAGE_IDS {
            assert!(!is_reported(id), "id {id} should be dropped");
        }
        assert!(is_reported(1281));
        assert!(is_reported(0));
    }

    #[test]
    fn decodes_enum_names() {
        assert_eq!(source_name(glow::DEBUG_SOURCE_SHADER_COMPILER), "Shader Compiler");
        assert_eq!(source_name(glow::DEBUG_SOURCE_WINDOW_SYSTEM), "Window System");
        assert_eq!(type_name(glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR), "Undefined Behaviour");
        assert_eq!(type_name(glow::DEBUG_TYPE_POP_GROUP), "Pop Group");
        assert_eq!(severity_name(glow::DEBUG_SEVERITY_NOTIFICATION), "notification");
        assert_eq!(source_name(0xdead), "Unknown");
        assert_eq!(type_name(0xdead), "Unknown");
        assert_eq!(severity_name(0xdead), "unknown");
    }

    #[test]
    fn formats_multi_line_report() {
        let message = DebugMessage {
            source: glow::DEBUG_SOURCE_API,
            kind: glow::DEBUG_TYPE_ERROR,
            id: 1282,
            severity: glow::DEBUG_SEVERITY_HIGH,
            text: "GL_INVALID_OPERATION in glDrawArrays\n",
        };
        assert_eq!(
            message.to_string(),
            "Debug message (1282): GL_INVALID_OPERATION in glDrawArrays\n\
             Source: API\n\
             Type: Error\n\
             Severity: high"
        );
    }

    #[test]
    fn report_drops_filtered_ids() {
        for id in IGNORED_MESSAGE_IDS {
            let output = captured(|| {
                report(
                    glow::DEBUG_SOURCE_API,
                    glow::DEBUG_TYPE_OTHER,
                    id,
                    glow::DEBUG_SEVERITY_HIGH,
                    "Buffer detailed info",
                )
            });
            assert!(output.is_empty(), "id {id} was logged: {output}");
        }
    }

    #[test]
    fn report_logs_at_severity_level() {
        let cases = [
            (glow::DEBUG_SEVERITY_HIGH, "ERROR", "high"),
            (glow::DEBUG_SEVERITY_MEDIUM, "WARN", "medium"),
            (glow::DEBUG_SEVERITY_LOW, "INFO", "low"),
            (glow::DEBUG_SEVERITY_NOTIFICATION, "DEBUG", "notification"),
        ];
        for (severity, level, label) in cases {
            let output = captured(|| {
                report(
                    glow::DEBUG_SOURCE_APPLICATION,
                    glow::DEBUG_TYPE_MARKER,
                    7,
                    severity,
                    "frame start",
                )
            });
            assert!(
                output.trim_start().starts_with(level),
                "{label} message logged as: {output}"
            );
            assert!(output.contains("Debug message (7): frame start"));
            assert!(output.contains("source=\"Application\""));
            assert!(output.contains(&format!("severity=\"{label}\"")));
        }
    }

    /// Runs `f` under a plain-text subscriber and returns everything it wrote.
    fn captured(f: impl FnOnce()) -> String {
        let buffer = CaptureWriter::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        buffer.contents()
    }

    #[derive(Clone, Default)]
    struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

    impl CaptureWriter {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
