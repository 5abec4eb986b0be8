//! Rarefactor: terminal front end for the Rarefactor search API
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::Parser;
use rarefactor::{
    api::{HttpBackend, SearchBackend},
    cache,
    config::{self, Settings},
    network::HttpClient,
    ui::{self, Command, SearchBox},
    SearchState,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rarefactor", version, about = "Search the Rarefactor API from a terminal")]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the search API
    #[arg(long)]
    api_url: Option<String>,

    /// Quiet interval before suggestions are fetched
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Disable the response cache
    #[arg(long)]
    no_cache: bool,

    /// Run one search, print it and exit
    #[arg(short, long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr so rendered output stays on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting Rarefactor v{}", rarefactor::VERSION);

    let settings = load_settings(&args)?;
    info!("Using search API at {}", settings.api.base_url);

    let client = HttpClient::with_settings(&settings.api, &settings.outgoing)?;
    let backend: Arc<dyn SearchBackend> =
        Arc::new(HttpBackend::new(client, &settings.api, &settings.suggest));
    let backend = cache::layer(backend, &settings.cache);

    let search_box = Arc::new(SearchBox::new(backend, &settings));

    let code = match args.query {
        Some(ref query) => one_shot(&search_box, query).await,
        None => interactive(Arc::clone(&search_box)).await?,
    };

    search_box.shutdown();
    Ok(code)
}

/// Load settings and apply command line overrides
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = config::load(args.config.as_deref())?;
    if let Some(ref url) = args.api_url {
        settings.api.base_url = url.clone();
    }
    if let Some(ms) = args.debounce_ms {
        settings.suggest.debounce_ms = ms;
    }
    if args.no_cache {
        settings.cache.enabled = false;
    }
    settings.validate()?;
    Ok(settings)
}

async fn one_shot(search_box: &SearchBox, query: &str) -> ExitCode {
    let mut rx = search_box.subscribe_search();
    if !search_box.search_controller().submit(query) {
        eprintln!("Nothing to search for");
        return ExitCode::FAILURE;
    }

    let state = match rx.wait_for(|s| s.is_settled()).await {
        Ok(state) => state.clone(),
        Err(_) => return ExitCode::FAILURE,
    };

    println!("{}\n", ui::page_title(query.trim()));
    print!("{}", ui::render_search_state(&state));
    match state {
        SearchState::Failed { .. } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

async fn interactive(search_box: Arc<SearchBox>) -> Result<ExitCode> {
    println!("Rarefactor Search v{} (:help for commands)", rarefactor::VERSION);

    let suggestion_printer = tokio::spawn({
        let search_box = Arc::clone(&search_box);
        async move {
            let mut rx = search_box.subscribe_suggestions();
            while rx.changed().await.is_ok() {
                let visible = search_box.visible_suggestions();
                if !visible.is_empty() {
                    print!("{}", ui::render_suggestions(&visible));
                }
            }
        }
    });

    let results_printer = tokio::spawn({
        let search_box = Arc::clone(&search_box);
        async move {
            let mut rx = search_box.subscribe_search();
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                if let Some(query) = state.query() {
                    if state.is_loading() {
                        println!("== {} ==", ui::page_title(query));
                    }
                }
                print!("{}", ui::render_search_state(&state));
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Type(text) => search_box.type_text(&text),
            Command::Enter => {
                search_box.press_enter();
            }
            Command::Pick(index) => {
                if search_box.select_suggestion(index).is_none() {
                    println!("No suggestion #{}", index + 1);
                }
            }
            Command::Focus => search_box.focus(),
            Command::Blur => search_box.blur(),
            Command::Dismiss => search_box.dismiss_suggestions(),
            Command::Show => {
                let input = search_box.input();
                println!("> {}", input.text);
                print!("{}", ui::render_suggestions(&search_box.visible_suggestions()));
                print!("{}", ui::render_search_state(&search_box.search_state()));
            }
            Command::Stats => {
                println!(
                    "suggestions: {}",
                    search_box.suggestion_controller().metrics()
                );
                println!("search: {}", search_box.search_controller().metrics());
            }
            Command::Help => print!("{}", ui::HELP),
            Command::Quit => break,
            Command::Unknown(cmd) => println!("Unknown command {:?} (:help)", cmd),
        }
    }

    suggestion_printer.abort();
    results_printer.abort();
    Ok(ExitCode::SUCCESS)
}
