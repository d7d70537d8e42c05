use std::fs;
use std::path::{Path, PathBuf};

use renderer::{default_shader_dir, Dims, WindowConfig};
use serde::Deserialize;

use crate::cli::Cli;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Contents of a `--config` TOML file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewerConfig {
    #[serde(default)]
    pub window: WindowSection,
    #[serde(default)]
    pub shaders: ShaderSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowSection {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub title: Option<String>,
    pub debug: Option<bool>,
    pub vsync: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShaderSection {
    /// Relative paths resolve against the configuration file's directory.
    pub directory: Option<PathBuf>,
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&raw)?;
        if let (Some(directory), Some(parent)) = (config.shaders.directory.as_mut(), path.parent())
        {
            if directory.is_relative() {
                *directory = parent.join(&*directory);
            }
        }
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        if config.window.width == Some(0) || config.window.height == Some(0) {
            return Err(ConfigError::Invalid(
                "window width and height must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Effective settings after layering flags over the file over defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub window: WindowConfig,
    pub shader_dir: PathBuf,
    pub frame_limit: Option<u64>,
}

impl Settings {
    pub fn resolve(cli: &Cli, file: Option<&ViewerConfig>) -> Self {
        let file = file.cloned().unwrap_or_default();
        let defaults = WindowConfig::default();

        let file_dims = Dims::new(
            file.window.width.unwrap_or(defaults.dims.width),
            file.window.height.unwrap_or(defaults.dims.height),
        );
        let dims = cli.size.unwrap_or(file_dims);
        let title = cli
            .title
            .clone()
            .or(file.window.title)
            .unwrap_or(defaults.title);
        let debug = !cli.no_debug && file.window.debug.unwrap_or(defaults.debug);
        let vsync = !cli.no_vsync && file.window.vsync.unwrap_or(defaults.vsync);

        let shader_dir = cli
            .shader_dir
            .clone()
            .or(file.shaders.directory)
            .unwrap_or_else(default_shader_dir);

        Self {
            window: WindowConfig::new(dims, title)
                .with_debug(debug)
                .with_vsync(vsync),
            shader_dir,
            frame_limit: cli.frames,
        }
    }
}
