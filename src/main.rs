use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use newsdeck::app::{App, AppEvent};
use newsdeck::article::{default_articles, load_articles};
use newsdeck::config::Config;
use newsdeck::ui;

/// Get the config directory path (~/.config/newsdeck/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("newsdeck"))
}

#[derive(Parser, Debug)]
#[command(
    name = "newsdeck",
    about = "Terminal news browser with live search and bookmarks"
)]
struct Args {
    /// Config file (default: ~/.config/newsdeck/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON file holding an array of articles
    #[arg(long, value_name = "FILE")]
    articles: Option<PathBuf>,

    /// Heading shown above the grid
    #[arg(long)]
    title: Option<String>,

    /// Line shown under the heading
    #[arg(long)]
    subtitle: Option<String>,

    /// Disable entrance and morph animations
    #[arg(long)]
    no_animations: bool,

    /// Prefer reduced motion (implies no animations)
    #[arg(long)]
    reduce_motion: bool,

    /// Hide the search box
    #[arg(long)]
    no_search: bool,

    /// Append log events to FILE instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut Config) -> Option<PathBuf> {
        if let Some(title) = self.title {
            config.title = title;
        }
        if let Some(subtitle) = self.subtitle {
            config.subtitle = subtitle;
        }
        if self.no_animations {
            config.enable_animations = false;
        }
        if self.reduce_motion {
            config.reduce_motion = true;
        }
        if self.no_search {
            config.show_search = false;
        }
        self.articles.or_else(|| config.articles_path.clone())
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            // stderr is the UI's terminal too; redirect it when RUST_LOG is raised
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let articles = match args.apply(&mut config) {
        Some(path) => load_articles(&path)
            .with_context(|| format!("Failed to load articles from {}", path.display()))?,
        None => {
            tracing::debug!("No articles file given, using built-in samples");
            default_articles()
        }
    };

    if articles.is_empty() {
        tracing::warn!("Article list is empty");
    }

    let mut app = App::new(&config, articles);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
