use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use chatroom::app::{App, Completion};
use chatroom::config::{ClientConfig, ConfigError};
use chatroom::console::{self, Flow};
use chatroom::net::api::{ApiClient, ApiError};
use chatroom::render;
use chatroom::router::{self, Route, RouteObserver};
use chatroom::store::{FileTokenStore, TokenStore};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("api client error: {0}")]
    Api(#[from] ApiError),
    #[error("terminal io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "chatroom", about = "Terminal client for the chatroom REST API")]
struct Cli {
    /// Backend base URL (overrides CHAT_API_URL).
    #[arg(long)]
    api_url: Option<String>,

    /// Session file (overrides CHAT_TOKEN_FILE).
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Client route to open first.
    #[arg(long, default_value = "/")]
    route: String,

    /// Print the client route list as JSON at startup.
    #[arg(long, default_value_t = false)]
    announce_routes: bool,
}

/// Prints the route list for an external host harness.
struct PrintRoutes;

impl RouteObserver for PrintRoutes {
    fn routes_available(&self, routes: &[&'static str]) {
        match serde_json::to_string(routes) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!(error = %e, "failed to encode route list"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url)?;
    }
    if let Some(token_file) = cli.token_file {
        config.token_file = token_file;
    }

    init_tracing(&config.log_level);
    if let Ok(path) = &dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    if cli.announce_routes {
        router::announce_routes(Some(&PrintRoutes));
    }

    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_file.clone()));
    let api = Arc::new(ApiClient::from_config(&config, Arc::clone(&store))?);
    info!(api_url = %config.api_url, token_file = %config.token_file.display(), "chatroom starting");

    let (app, completions) = App::new(api, store, Route::parse(&cli.route));
    run(app, completions).await
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// Interactive loop: terminal lines and request completions, one at a time.
async fn run(mut app: App, mut completions: mpsc::UnboundedReceiver<Completion>) -> Result<(), CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    draw(&app, None)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match console::apply(&mut app, console::parse(&line)) {
                    Flow::Quit => break,
                    Flow::Notice(notice) => draw(&app, Some(&notice))?,
                    Flow::Continue => draw(&app, None)?,
                }
            }
            Some(completion) = completions.recv() => {
                app.handle(completion);
                draw(&app, None)?;
            }
        }
    }

    info!("chatroom exiting");
    Ok(())
}

fn draw(app: &App, notice: Option<&str>) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    writeln!(out, "\n--- {} ---", app.route().path())?;
    for line in render::render(app.view()) {
        writeln!(out, "{line}")?;
    }
    if let Some(notice) = notice {
        writeln!(out, "{notice}")?;
    }
    out.flush()?;
    Ok(())
}
