use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mandi_price::config::Config;
use mandi_price::events::{Event, SearchQuery};
use mandi_price::search::SearchCoordinator;
use mandi_price::service::PriceService;
use mandi_price::state::SearchState;

/// Suggest an asking price from current mandi prices
#[derive(Parser)]
#[command(name = "mandi-price")]
struct Cli {
    /// Product to look up once. Omit to read `product[, region]` lines from stdin.
    product: Option<String>,

    /// State to restrict the lookup to
    #[arg(long, short)]
    region: Option<String>,

    #[arg(long, default_value = "config.toml")]
    config: String,
}

// How long to wait for the last typed search after stdin closes
const DRAIN_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load_with_env(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.general.log_level)),
        )
        .with_target(false)
        .init();

    if cfg.api_key().is_none() {
        info!("No DATA_GOV_API_KEY configured, lookups will report unavailable");
    }

    let service = Arc::new(PriceService::from_config(&cfg)?);

    match cli.product {
        Some(product) => {
            let response = service.query(Some(product.as_str()), cli.region.as_deref()).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        None => run_interactive(service, &cfg).await?,
    }

    Ok(())
}

async fn run_interactive(service: Arc<PriceService>, cfg: &Config) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let coordinator = SearchCoordinator::new(service, &cfg.search, tx);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut state = SearchState::default();
    // Last submitted search still waiting for its result
    let mut outstanding: Option<SearchQuery> = None;

    println!("Type a product, optionally followed by `, region`. Ctrl+D to quit.\n");

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    let (product, region) = split_input(&line);
                    let query = SearchQuery::new(product, region);
                    outstanding = (query.product.chars().count() >= cfg.search.min_query_chars)
                        .then_some(query);
                    coordinator.search(product, region).await;
                }
                None => break,
            },
            Some(event) = rx.recv() => {
                if outstanding.as_ref().is_some_and(|q| event.settles(q)) {
                    outstanding = None;
                }
                state.apply(event);
                render(&state);
            }
        }
    }

    // stdin closed; let the last search finish
    while outstanding.is_some() {
        match timeout(DRAIN_TIMEOUT, rx.recv()).await {
            Ok(Some(event)) => {
                if outstanding.as_ref().is_some_and(|q| event.settles(q)) {
                    outstanding = None;
                }
                state.apply(event);
                render(&state);
            }
            _ => break,
        }
    }

    Ok(())
}

fn split_input(line: &str) -> (&str, Option<&str>) {
    match line.split_once(',') {
        Some((product, region)) => (product.trim(), Some(region.trim())),
        None => (line.trim(), None),
    }
}

fn render(state: &SearchState) {
    match state {
        SearchState::Idle => println!("(cleared)"),
        SearchState::Loading { query } => match &query.region {
            Some(region) => println!("Looking up {} in {}...", query.product, region),
            None => println!("Looking up {}...", query.product),
        },
        SearchState::Ready { prediction, .. } => {
            let s = &prediction.summary;
            println!(
                "{} on {}: min ₹{} | modal ₹{} | max ₹{} per quintal ({} markets)",
                prediction.commodity,
                prediction.arrival_date,
                s.min_price,
                s.modal_price,
                s.max_price,
                s.market_count
            );
        }
        SearchState::NoData { .. } | SearchState::Failed { .. } => {
            if let Some(message) = state.message() {
                println!("{}", message);
            }
        }
    }
}
