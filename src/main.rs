mod extract;
mod filter;
mod floor;
mod ledger;
mod listing;
mod notify;
mod pipeline;
mod source;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

use extract::Context;
use filter::Criteria;
use ledger::Ledger;
use notify::{ConsoleSink, MessageSink};
use source::HttpSource;

const LEDGER_PATH: &str = "data/seen_listings.json";

// One search page per portal; criteria that can ride in the URL are baked in,
// the rest is enforced by the filter.
const SOURCES: &[(&str, &str)] = &[
    (
        "olx",
        "https://www.olx.pl/nieruchomosci/mieszkania/sprzedaz/wroclaw/",
    ),
    (
        "otodom",
        "https://www.otodom.pl/pl/wyniki/sprzedaz/mieszkanie/dolnoslaskie/wroclaw/wroclaw/wroclaw?areaMin=35&areaMax=55&roomsNumber=%5BTWO%2CTHREE%5D&limit=72",
    ),
];

#[derive(Parser)]
#[command(name = "flat_scout", about = "Apartment listing monitor for OLX and Otodom")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan both portals, filter new listings, report matches
    Run {
        /// Max cards to process per portal (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Run the field extractor against a saved text blob
    Check {
        /// Path to a text file with card or page text
        file: PathBuf,
        /// Treat the blob as a full listing page instead of a card
        #[arg(long)]
        detail: bool,
    },
    /// Show dedup ledger statistics
    Seen,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { limit } => run(limit),
        Commands::Check { file, detail } => check(&file, detail),
        Commands::Seen => seen(),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn run(limit: Option<usize>) -> anyhow::Result<()> {
    let criteria = Criteria::default();
    let mut ledger = Ledger::load(Path::new(LEDGER_PATH))?;
    info!("{} listings in ledger", ledger.len());

    let mut matches = Vec::new();
    for (name, url) in SOURCES {
        println!("Scanning {}...", name);
        let mut source = HttpSource::new(url)?;
        let (records, counts) = pipeline::run(&mut source, &mut ledger, &criteria, limit)?;
        counts.print(name);
        matches.extend(records);
    }

    if matches.is_empty() {
        println!("No new matching listings.");
    } else {
        ConsoleSink.deliver(&matches)?;
    }
    Ok(())
}

fn check(file: &Path, detail: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)?;
    let ctx = if detail { Context::Detail } else { Context::Summary };
    let fields = extract::extract_fields(&text, ctx);
    println!("{}", serde_json::to_string_pretty(&fields)?);

    if let Some(descriptor) = &fields.floor {
        let pos = floor::parse(descriptor);
        let ok = floor::is_valid(descriptor, &Criteria::default().floor_policy);
        println!(
            "floor: current={:?} total={:?} policy={}",
            pos.current,
            pos.total,
            if ok { "pass" } else { "reject" }
        );
    }
    Ok(())
}

fn seen() -> anyhow::Result<()> {
    let ledger = Ledger::load(Path::new(LEDGER_PATH))?;
    println!("Ledger:  {}", ledger.path().display());
    println!("Entries: {}", ledger.len());
    Ok(())
}
