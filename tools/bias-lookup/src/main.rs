//! Look up the political bias and reliability of news sources.

mod config;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bias_common::normalization::is_http_url;
use bias_resolver::clock::SystemClock;
use bias_resolver::message;
use bias_resolver::source::{BundledSource, DatabaseSource, FileSource};
use bias_resolver::store::{FileStore, KeyValueStore};
use bias_resolver::{BiasCategory, BiasResolver};
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{default_store_dir, Config};

#[derive(Parser)]
#[command(name = "bias-lookup")]
#[command(about = "Media bias and reliability lookup for links and citations")]
#[command(version)]
struct Cli {
    /// Configuration file (default: <config dir>/media-bias-lens/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for cached data (default: <cache dir>/media-bias-lens)
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Bias data file (JSON) instead of the bundled one
    #[arg(long)]
    database: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the publisher behind a link
    Url {
        url: String,

        /// Also print the matching tier and canonical domain
        #[arg(long)]
        explain: bool,
    },

    /// Resolve a citation such as "Reporting by Reuters"
    Text { text: String },

    /// Suggest sources from the other bias categories
    Alternatives {
        /// Category to leave out (left, lean-left, center, lean-right, right)
        #[arg(default_value = "unknown")]
        bias: String,
    },

    /// Resolve every link in a list, one URL per line
    Scan {
        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Only print links with a known bias or reliability
        #[arg(long)]
        known_only: bool,
    },

    /// Answer JSON requests read from stdin, one per line
    Serve,

    /// Reload the bias database from its source
    Refresh,
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

fn build_resolver(cli: &Cli, config: Config) -> BiasResolver {
    let store_dir = cli
        .store_dir
        .clone()
        .or(config.store_dir)
        .unwrap_or_else(default_store_dir);
    let source: Arc<dyn DatabaseSource> = match cli.database.clone().or(config.database) {
        Some(path) => {
            debug!(path = %path.display(), "using bias data file");
            Arc::new(FileSource::new(path))
        }
        None => Arc::new(BundledSource::default()),
    };
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(store_dir));
    BiasResolver::new(config.resolver, source, store, Arc::new(SystemClock))
}

/// Read the link list. Invalid UTF-8 is replaced so one bad line does not
/// lose the rest.
async fn read_input(input: Option<&PathBuf>) -> Result<String> {
    let bytes = match input {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read '{}'", path.display()))?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Resolve each distinct link once. Repeats of a URL or of a canonical domain
/// already reported are skipped.
async fn scan(resolver: &mut BiasResolver, input: &str, known_only: bool) -> Result<()> {
    let mut seen_urls = HashSet::new();
    let mut seen_domains = HashSet::new();
    let mut reported = 0usize;

    for line in input.lines() {
        let url = line.trim();
        if !is_http_url(url) || !seen_urls.insert(url.to_string()) {
            continue;
        }
        let resolution = resolver.resolve_url_detailed(url).await;
        if let Some(domain) = &resolution.domain {
            if !seen_domains.insert(domain.clone()) {
                continue;
            }
        }
        if known_only && resolution.result.is_unknown() {
            continue;
        }
        reported += 1;
        println!(
            "{}",
            json!({
                "url": url,
                "domain": resolution.domain,
                "biasData": resolution.result,
            })
        );
    }
    info!(links = seen_urls.len(), reported, "scan finished");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = Config::resolve(cli.config.as_deref())?;
    let mut resolver = build_resolver(&cli, config);

    match cli.command {
        Commands::Url { url, explain } => {
            let resolution = resolver.resolve_url_detailed(&url).await;
            let out = if explain {
                json!({
                    "biasData": resolution.result,
                    "tier": format!("{:?}", resolution.tier),
                    "domain": resolution.domain,
                })
            } else {
                json!({ "biasData": resolution.result })
            };
            println!("{}", out);
        }
        Commands::Text { text } => {
            let result = resolver.resolve_by_text(&text).await;
            println!("{}", json!({ "biasData": result }));
        }
        Commands::Alternatives { bias } => {
            let alternatives = resolver.alternatives(BiasCategory::parse(&bias)).await;
            println!("{}", json!({ "alternatives": alternatives }));
        }
        Commands::Scan { input, known_only } => {
            let text = read_input(input.as_ref()).await?;
            scan(&mut resolver, &text, known_only).await?;
        }
        Commands::Serve => {
            let stdin = BufReader::new(tokio::io::stdin());
            message::serve(&mut resolver, stdin, tokio::io::stdout()).await?;
        }
        Commands::Refresh => {
            let records = resolver.refresh().await;
            println!("{}", json!({ "records": records }));
        }
    }
    Ok(())
}
