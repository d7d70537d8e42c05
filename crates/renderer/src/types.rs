use std::fmt;
use std::path::Path;
use std::str::FromStr;

use winit::dpi::{LogicalSize, PhysicalSize};

/// Integer width/height pair used for both window and framebuffer sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    pub width: u32,
    pub height: u32,
}

impl Dims {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either side is zero (e.g. a minimised window).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for Dims {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<PhysicalSize<u32>> for Dims {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

impl From<LogicalSize<u32>> for Dims {
    fn from(size: LogicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

impl From<(u32, u32)> for Dims {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// Parses `WIDTHxHEIGHT` (`x`, `X` or `×` as separator).
impl FromStr for Dims {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let trimmed = spec.trim();
        let (width, height) = trimmed
            .split_once(['x', 'X', '×'])
            .ok_or_else(|| "expected WxH format, e.g. 800x600".to_string())?;

        let width: u32 = width
            .trim()
            .parse()
            .map_err(|_| format!("invalid width in size specification '{trimmed}'"))?;
        let height: u32 = height
            .trim()
            .parse()
            .map_err(|_| format!("invalid height in size specification '{trimmed}'"))?;

        if width == 0 || height == 0 {
            return Err("window dimensions must be greater than zero".to_string());
        }

        Ok(Self::new(width, height))
    }
}

/// Programmable pipeline stage a [`crate::Shader`] is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    Compute,
}

impl ShaderStage {
    /// Infers the stage from the conventional file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "vert" | "vs" => Some(Self::Vertex),
            "frag" | "fs" => Some(Self::Fragment),
            "geom" | "gs" => Some(Self::Geometry),
            "comp" | "cs" => Some(Self::Compute),
            _ => None,
        }
    }

    pub(crate) fn gl_enum(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
            Self::Geometry => glow::GEOMETRY_SHADER,
            Self::Compute => glow::COMPUTE_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
            Self::Geometry => f.write_str("geometry"),
            Self::Compute => f.write_str("compute"),
        }
    }
}

/// Start-up parameters for [`crate::Window`].
///
/// `debug` asks for a debug context and installs the driver message callback
/// when the context actually reports the debug flag. `any_thread` permits
/// opening the event loop off the main thread on Linux, which the test
/// harness needs.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Initial logical window size.
    pub dims: Dims,
    pub title: String,
    pub debug: bool,
    pub vsync: bool,
    pub any_thread: bool,
}

impl WindowConfig {
    pub fn new(dims: Dims, title: impl Into<String>) -> Self {
        Self {
            dims,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_any_thread(mut self, any_thread: bool) -> Self {
        self.any_thread = any_thread;
        self
    }
}

impl Default for WindowConfig {
    /// An 800x600 debug window with vsync on.
    fn default() -> Self {
        Self {
            dims: Dims::default(),
            title: String::from("volview"),
            debug: true,
            vsync: true,
            any_thread: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_size_specifications() {
        assert_eq!("1280x720".parse::<Dims>().unwrap(), Dims::new(1280, 720));
        assert_eq!(" 640 X 480 ".parse::<Dims>().unwrap(), Dims::new(640, 480));
        assert_eq!("800×600".parse::<Dims>().unwrap(), Dims::new(800, 600));
    }

    #[test]
    fn rejects_malformed_sizes() {
        assert!("1280".parse::<Dims>().is_err());
        assert!("0x720".parse::<Dims>().is_err());
        assert!("axb".parse::<Dims>().is_err());
        assert!("1280x-1".parse::<Dims>().is_err());
    }

    #[test]
    fn dims_display_round_trips_through_parse() {
        let dims = Dims::new(1920, 1080);
        assert_eq!(dims.to_string(), "1920x1080");
        assert_eq!(dims.to_string().parse::<Dims>().unwrap(), dims);
    }

    #[test]
    fn zero_sided_dims_are_empty() {
        assert!(Dims::new(800, 0).is_empty());
        assert!(Dims::new(0, 600).is_empty());
        assert!(!Dims::new(1, 1).is_empty());
    }

    #[test]
    fn stage_is_inferred_from_extension() {
        assert_eq!(
            ShaderStage::from_path(Path::new("shaders/quad_passthrough.vert")),
            Some(ShaderStage::Vertex)
        );
        assert_eq!(
            ShaderStage::from_path(Path::new("color_correction.frag")),
            Some(ShaderStage::Fragment)
        );
        assert_eq!(ShaderStage::from_path(Path::new("noise.comp")), Some(ShaderStage::Compute));
        assert_eq!(ShaderStage::from_path(Path::new("README.md")), None);
        assert_eq!(ShaderStage::from_path(Path::new("shader")), None);
    }

    #[test]
    fn stage_maps_to_gl_enum() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_enum(), glow::FRAGMENT_SHADER);
    }

    #[test]
    fn window_config_defaults_enable_debug_and_vsync() {
        let config = WindowConfig::new(Dims::new(1024, 768), "viewer");
        assert_eq!(config.dims, Dims::new(1024, 768));
        assert_eq!(config.title, "viewer");
        assert!(config.debug);
        assert!(config.vsync);
        assert!(!config.any_thread);

        let config = config.with_debug(false).with_vsync(false);
        assert!(!config.debug);
        assert!(!config.vsync);
    }
}
