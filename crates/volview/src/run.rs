use anyhow::{Context, Result};
use renderer::{Renderer, Window};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::{Settings, ViewerConfig};

pub fn run(args: Cli) -> Result<()> {
    initialise_tracing(args.log_level.as_deref());

    let file = args
        .config
        .as_deref()
        .map(ViewerConfig::load)
        .transpose()
        .context("failed to load configuration file")?;
    let settings = Settings::resolve(&args, file.as_ref());
    tracing::info!(
        size = %settings.window.dims,
        title = %settings.window.title,
        shaders = %settings.shader_dir.display(),
        debug = settings.window.debug,
        vsync = settings.window.vsync,
        "starting volview"
    );

    let window = Window::with_config(settings.window.clone()).context("failed to open window")?;
    if settings.window.debug && !window.debug_output_enabled() {
        tracing::info!("driver did not grant a debug context; debug output disabled");
    }

    let mut renderer = Renderer::new(&window, &settings.shader_dir).with_context(|| {
        format!(
            "failed to build renderer from shaders in {}",
            settings.shader_dir.display()
        )
    })?;

    let frames = render_loop(&window, &mut renderer, settings.frame_limit);
    tracing::info!(frames, "window closed");
    Ok(())
}

fn render_loop(window: &Window, renderer: &mut Renderer<'_>, frame_limit: Option<u64>) -> u64 {
    let mut frames = 0u64;
    loop {
        renderer.update();
        frames += 1;
        if frame_limit.is_some_and(|limit| frames >= limit) {
            tracing::debug!(frames, "frame limit reached");
            window.close();
        }
        if !window.update() {
            return frames;
        }
    }
}

fn initialise_tracing(level: Option<&str>) {
    let filter = match level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
