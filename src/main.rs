use anyhow::{Context, Result};
use clap::Parser;
use snake_arena::game::GameConfig;
use snake_arena::modes::HumanMode;
use snake_arena::storage::HighScoreStore;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

#[derive(Parser)]
#[command(name = "snake_arena")]
#[command(version, about = "Snake arena: outscore the AI snakes before time runs out")]
struct Cli {
    /// JSON file with game settings; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Width and height of the grid
    #[arg(long)]
    grid_size: Option<usize>,

    /// Session length in seconds
    #[arg(long)]
    time_limit_secs: Option<u64>,

    /// AI snakes present at the start
    #[arg(long)]
    ai_count: Option<usize>,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// File holding the high score
    #[arg(long, default_value = "highscore.txt")]
    high_score_file: PathBuf,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Load the config file, then apply command-line overrides
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(secs) = self.time_limit_secs {
            config.time_limit_ms = secs.saturating_mul(1000);
        }
        if let Some(ai_count) = self.ai_count {
            config.initial_ai_count = ai_count;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config
            .validate()
            .context("Invalid game configuration")?;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse config {:?}", path))
}

/// The terminal belongs to the TUI, so logs only go to a file when asked
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    let store = HighScoreStore::new(&cli.high_score_file);
    info!(?config, high_score_file = ?store.path(), "starting snake arena");

    let mut human_mode = HumanMode::new(config, store);
    human_mode.run().await?;

    Ok(())
}
