//! Roomview Terminal - interactive room and furniture viewer
//!
//! Controls:
//!   - Mouse drag: orbit the camera, or move the clicked piece
//!   - Wheel / +/-: zoom
//!   - R/T/F/S: reset, top, front and side views
//!   - 1-9: add furniture; Tab: select; IJKL: move; ,/.: turn
//!   - Q/ESC: Quit

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use roomview_core::{FurnitureType, MeshFit, ModelCache};
use roomview_terminal::{AppConfig, ObjDirectoryLoader, TerminalApp};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "roomview-terminal", about = "Furnished room viewer for the terminal", version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding <model>.obj files
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Room width in cm (overrides the config)
    #[arg(long)]
    width: Option<u32>,

    /// Room length in cm (overrides the config)
    #[arg(long)]
    length: Option<u32>,

    /// Room height in cm (overrides the config)
    #[arg(long)]
    height: Option<u32>,

    /// Draw with ASCII shading instead of truecolor
    #[arg(long)]
    ascii: bool,

    /// Log file; the terminal itself is used for drawing
    #[arg(long, default_value = "roomview.log")]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roomview_core=info,roomview_terminal=info".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Loads configured models, or every furniture type by name when the config
/// lists none.
fn load_models(config: &AppConfig, models_dir: Option<&Path>) -> ModelCache {
    let mut cache = ModelCache::new();
    let Some(dir) = models_dir else {
        return cache;
    };
    let loader = ObjDirectoryLoader::new(dir);

    if config.models.is_empty() {
        for kind in FurnitureType::ALL {
            cache.load(kind, &loader, kind.name(), MeshFit::identity());
        }
    } else {
        for entry in &config.models {
            if !cache.load(entry.kind, &loader, &entry.model, entry.fit()) {
                warn!(kind = %entry.kind, model = %entry.model, "using primitive shapes");
            }
        }
    }
    cache
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(width) = cli.width {
        config.room.width = width;
    }
    if let Some(length) = cli.length {
        config.room.length = length;
    }
    if let Some(height) = cli.height {
        config.room.height = height;
    }
    config.ascii |= cli.ascii;

    info!("roomview-terminal v{} starting", env!("CARGO_PKG_VERSION"));
    let models = load_models(&config, cli.models_dir.as_deref());
    info!(models = models.len(), "models ready");

    let (cols, rows) = crossterm::terminal::size().context("failed to query terminal size")?;
    let mut app = TerminalApp::new(
        config.room.build(),
        config.settings,
        models,
        config.ascii,
        cols,
        rows,
    );
    app.run().context("terminal session failed")?;

    println!("Thank you for using Roomview!");
    Ok(())
}
