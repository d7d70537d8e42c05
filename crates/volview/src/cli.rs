use std::path::PathBuf;

use clap::Parser;
use renderer::Dims;

#[derive(Parser, Debug)]
#[command(
    name = "volview",
    author,
    version,
    about = "OpenGL visualization viewer"
)]
pub struct Cli {
    /// Initial window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_dims)]
    pub size: Option<Dims>,

    /// Window title.
    #[arg(long)]
    pub title: Option<String>,

    /// Directory containing `quad_passthrough.vert` and the fragment shaders.
    #[arg(long, value_name = "DIR", env = "VOLVIEW_SHADER_DIR")]
    pub shader_dir: Option<PathBuf>,

    /// TOML file with `[window]` and `[shaders]` tables; flags override it.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip requesting a debug context and the driver message callback.
    #[arg(long)]
    pub no_debug: bool,

    /// Present without waiting for the display refresh.
    #[arg(long)]
    pub no_vsync: bool,

    /// Close the window after rendering this many frames.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub frames: Option<u64>,

    /// Log filter used instead of `RUST_LOG` (e.g. `debug` or `renderer=trace`).
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_dims(value: &str) -> Result<Dims, String> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_flag_set() {
        let cli = Cli::try_parse_from([
            "volview",
            "--size",
            "1280x720",
            "--title",
            "viewer",
            "--shader-dir",
            "/opt/volview/shaders",
            "--no-debug",
            "--no-vsync",
            "--frames",
            "3",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.size, Some(Dims::new(1280, 720)));
        assert_eq!(cli.title.as_deref(), Some("viewer"));
        assert_eq!(cli.shader_dir, Some(PathBuf::from("/opt/volview/shaders")));
        assert!(cli.no_debug);
        assert!(cli.no_vsync);
        assert_eq!(cli.frames, Some(3));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn rejects_zero_sized_window() {
        let err = Cli::try_parse_from(["volview", "--size", "0x600"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn rejects_zero_frame_limit() {
        assert!(Cli::try_parse_from(["volview", "--frames", "0"]).is_err());
    }

    #[test]
    fn flags_default_to_unset() {
        let cli = Cli::try_parse_from(["volview"]).unwrap();
        assert!(cli.size.is_none());
        assert!(cli.title.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.no_debug);
        assert!(!cli.no_vsync);
        assert!(cli.frames.is_none());
    }
}
