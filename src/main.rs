use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use house_walkthrough::app::{run_inspect, run_replay, run_views};
use house_walkthrough::io::config::Config;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// House walkthrough: scene import, window classification and fly camera.
#[derive(Parser, Debug)]
#[command(name = "walkthrough", version)]
struct Cli {
    /// Scene configuration (TOML). Built-in defaults are used when it is missing.
    #[arg(short, long, value_name = "FILE", default_value = "scene.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load every configured model and report its meshes, windows and textures.
    Inspect,
    /// Print the preset camera views.
    Views,
    /// Play a recorded input script against the scene headlessly.
    Replay {
        /// Input script (TOML list of frames).
        script: PathBuf,
    },
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        info!("Loading configuration: {:?}", path);
        Config::load(path).with_context(|| format!("loading {}", path.display()))
    } else {
        warn!("{:?} not found, using built-in defaults", path);
        Ok(Config::default())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let base_dir = cli
        .config
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    match cli.command {
        Command::Inspect => run_inspect(&config, &base_dir).context("inspect failed")?,
        Command::Views => run_views(&config).context("views failed")?,
        Command::Replay { script } => {
            run_replay(&config, &base_dir, &script).context("replay failed")?
        }
    }
    Ok(())
}
