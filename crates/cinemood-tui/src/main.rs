use std::time::Duration;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

mod app;
mod cli;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use cinemood_core::Config;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "cinemood")]
#[command(about = "Browse movies and get recommendations that match your mood")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Recommendation backend base URL (overrides config and CINEMOOD_BACKEND_URL)
    #[arg(long, global = true)]
    backend_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print this week's popular movies
    Popular,
    /// Search movies by title
    Search {
        /// Title to search for
        query: String,
    },
    /// Print the emotion statistics
    Stats,
    /// Print the most recommended movies
    Top10,
    /// Show or update the config file
    Config {
        /// API key for the movie metadata service
        #[arg(long)]
        tmdb_api_key: Option<String>,
    },
}

fn load_config(backend_url: Option<String>) -> Config {
    let mut config = Config::load_or_default();
    if let Some(url) = backend_url {
        config.backend_url = url;
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let Some(command) = args.command else {
        return run_tui(args.backend_url).await;
    };

    logging::init_stderr()?;

    match command {
        Commands::Popular => cli::popular(&load_config(args.backend_url)).await?,
        Commands::Search { query } => cli::search(&load_config(args.backend_url), &query).await?,
        Commands::Stats => cli::emotion_stats(&load_config(args.backend_url)).await?,
        Commands::Top10 => cli::most_recommended(&load_config(args.backend_url)).await?,
        Commands::Config { tmdb_api_key } => cli::configure(tmdb_api_key, args.backend_url)?,
    }

    Ok(())
}

async fn run_tui(backend_url: Option<String>) -> Result<()> {
    let log_path = logging::init_file()?;
    let config = load_config(backend_url);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %config.backend_url,
        log = %log_path.display(),
        "starting cinemood"
    );

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut events = EventHandler::new(Duration::from_secs(config.rotation_secs.max(1)));
    let mut app = App::new(&config, events.sender());
    app.start();

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut tui::Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}
