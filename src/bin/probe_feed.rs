use anyhow::{bail, Result};
use std::time::Instant;

use mandi_price::api::{AgmarknetClient, MarketFeed};
use mandi_price::config::Config;
use mandi_price::pricing::{normalize_record, CommodityResolver};

/// Hit the feed once per resolved candidate and report what came back.
///
/// Usage: probe_feed <product> [region]
#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(product) = args.next() else {
        bail!("usage: probe_feed <product> [region]");
    };
    let region = args.next();

    let cfg = Config::load_with_env("config.toml")?;
    let client = AgmarknetClient::new(&cfg)?;
    if !client.has_api_key() {
        bail!("DATA_GOV_API_KEY is required (set in .env or environment)");
    }

    let resolver = CommodityResolver::with_synonyms(cfg.synonym_entries()?);
    let candidates = resolver.resolve(&product);
    println!("Candidates for {:?}: {:?}\n", product, candidates);

    let mut times: Vec<u128> = Vec::new();

    for commodity in &candidates {
        let start = Instant::now();
        let result = client.fetch_records(commodity, region.as_deref()).await;
        let elapsed = start.elapsed().as_millis();
        times.push(elapsed);

        match result {
            Ok(records) => {
                let total = records.len();
                let valid = records
                    .into_iter()
                    .filter_map(|r| normalize_record(r).ok())
                    .count();
                println!(
                    "{:<32} {:>5} records ({} valid) in {}ms",
                    commodity, total, valid, elapsed
                );
            }
            Err(e) => println!("{:<32} failed in {}ms: {}", commodity, elapsed, e),
        }
    }

    if times.is_empty() {
        return Ok(());
    }

    times.sort();
    let sum: u128 = times.iter().sum();
    let avg = sum / times.len() as u128;

    println!("\n=== FEED LATENCY ({} calls) ===", times.len());
    println!("Min:    {}ms", times[0]);
    println!("Max:    {}ms", times[times.len() - 1]);
    println!("Avg:    {}ms", avg);
    println!("Median: {}ms", times[times.len() / 2]);

    Ok(())
}
