use clap::Parser;
use std::path::PathBuf;
use zstylus::drag::DragMode;
use zstylus::InteractionConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// JSON replay script to play.
    pub script: PathBuf,
    /// JSON interaction configuration applied before the script's own `config` block.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub drag_mode: Option<DragMode>,
    #[arg(long)]
    pub min_drag_distance: Option<f32>,
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,
}

impl CliArgs {
    /// Base configuration: defaults, then the `--config` file.
    pub fn base_config(&self) -> anyhow::Result<InteractionConfig> {
        match &self.config {
            Some(path) => InteractionConfig::load(path),
            None => Ok(InteractionConfig::default()),
        }
    }

    /// Applies the command-line overrides, which take precedence over every file.
    pub fn apply_overrides(&self, config: &mut InteractionConfig) {
        if let Some(mode) = self.drag_mode {
            config.drag_mode = mode;
        }
        if let Some(distance) = self.min_drag_distance {
            config.min_drag_distance = distance;
        }
    }
}
