//! Telemetry feed summary.
//! Reads a saved channel-field feed response and prints per-field statistics.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use landcover_core::telemetry::{feed_url, FieldFeed, DEFAULT_RESULTS};

#[derive(Parser, Debug)]
#[command(name = "feed", about = "Summarise IoT telemetry feed responses")]
struct Args {
    /// Saved feed response JSON; stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Field ids to summarise (1-8); repeat for several.
    #[arg(short, long = "field", default_values_t = [1u8])]
    fields: Vec<u8>,

    /// Channel id, used for --url-only.
    #[arg(short, long, default_value_t = 2928250)]
    channel: u64,

    /// Number of entries to request, used for --url-only.
    #[arg(short, long, default_value_t = DEFAULT_RESULTS)]
    results: u32,

    /// Print the feed URLs to fetch and exit.
    #[arg(long)]
    url_only: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.url_only {
        for &field in &args.fields {
            println!("{}", feed_url(args.channel, field, args.results)?);
        }
        return Ok(());
    }

    let json = match &args.input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };
    let feed = FieldFeed::from_json(&json)?;
    log::info!("{} feed entries", feed.feeds.len());

    for &field in &args.fields {
        let series = feed.series(field)?;
        let label = feed.field_name(field).map(str::to_string).unwrap_or_else(|| format!("field {field}"));
        match series.summary() {
            Some(s) => println!(
                "{label}: n={} min={:.2} max={:.2} mean={:.2} last={:.2}",
                s.count, s.min, s.max, s.mean, s.last
            ),
            None => {
                log::warn!("{label}: no timestamped entries");
                println!("{label}: no data");
            }
        }
    }

    Ok(())
}
