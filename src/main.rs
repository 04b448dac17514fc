//! Domain-Harvester main entry point
//!
//! This is the command-line interface for the Domain-Harvester crawler.

use anyhow::{bail, Context};
use clap::Parser;
use domain_harvester::config::{load_config_with_hash, validate, AuthConfig, Config, CrawlerConfig};
use domain_harvester::output::{print_statistics, write_summary, CrawlStats, JsonlWriter};
use domain_harvester::{Crawler, HarvestError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Domain-Harvester: a polite single-domain text harvester
///
/// Crawls one website breadth-first from a seed URL, optionally logging in
/// first, and writes the visible text of every page as JSON Lines.
#[derive(Parser, Debug)]
#[command(name = "domain-harvester")]
#[command(version)]
#[command(about = "A polite single-domain text harvester", long_about = None)]
struct Cli {
    /// Seed URL (overrides base-url from the config file)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to visit
    #[arg(long)]
    max_pages: Option<u32>,

    /// Delay between requests in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// User-Agent header to send
    #[arg(long)]
    user_agent: Option<String>,

    /// Username for HTTP Basic authentication
    #[arg(long, env = "HARVEST_USERNAME")]
    username: Option<String>,

    /// Password for HTTP Basic authentication
    #[arg(long, env = "HARVEST_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "HARVEST_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Write documents to this JSON Lines file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write run statistics to this JSON file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout can carry the document stream.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("domain_harvester=info,warn"),
            1 => EnvFilter::new("domain_harvester=debug,info"),
            2 => EnvFilter::new("domain_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the effective configuration from the config file and CLI overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            let Some(url) = &cli.url else {
                bail!("A seed URL is required when no --config file is given");
            };
            Config {
                crawler: CrawlerConfig::new(url.as_str()),
                auth: AuthConfig::None,
                output: Default::default(),
            }
        }
    };

    if let Some(url) = &cli.url {
        config.crawler.base_url = url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.crawler.delay_ms = delay_ms;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.crawler.timeout_secs = timeout_secs;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.crawler.user_agent = user_agent.clone();
    }

    if let Some(token) = cli.token.as_deref().filter(|t| !t.is_empty()) {
        config.auth = AuthConfig::Token {
            token: token.to_string(),
        };
    } else {
        let basic = AuthConfig::from_credentials(cli.username.as_deref(), cli.password.as_deref());
        if basic != AuthConfig::None {
            config.auth = basic;
        }
    }

    if let Some(output) = &cli.output {
        config.output.path = Some(output.display().to_string());
    }
    if let Some(summary) = &cli.summary {
        config.output.summary_path = Some(summary.display().to_string());
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Domain-Harvester Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.base_url);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Delay: {}ms", config.crawler.delay_ms);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nAuthentication: {}", config.auth.method());
    if let AuthConfig::SessionLogin { login_url, .. } = &config.auth {
        println!("  Login URL: {}", login_url);
    }

    println!("\nOutput:");
    println!(
        "  Documents: {}",
        config.output.path.as_deref().unwrap_or("<stdout>")
    );
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, quiet: bool) -> anyhow::Result<()> {
    let crawler = Crawler::from_config(&config).context("Failed to set up crawler")?;

    let (stats, written) = match &config.output.path {
        Some(path) => {
            let writer = JsonlWriter::create(Path::new(path))
                .with_context(|| format!("Failed to create output file {}", path))?;
            stream_documents(crawler, writer).await?
        }
        None => stream_documents(crawler, JsonlWriter::new(std::io::stdout().lock())).await?,
    };

    if written == 0 {
        tracing::error!("No documents were extracted during crawling");
    } else {
        tracing::info!("Wrote {} documents", written);
    }

    if let Some(path) = &config.output.summary_path {
        write_summary(&stats, Path::new(path))
            .with_context(|| format!("Failed to write summary to {}", path))?;
        tracing::info!("Summary written to {}", path);
    }

    if !quiet {
        print_statistics(&stats);
    }

    Ok(())
}

/// Runs the crawl, writing each document as soon as it is harvested
///
/// Returns the run statistics and the number of documents written.
async fn stream_documents<W: Write>(
    crawler: Crawler,
    mut writer: JsonlWriter<W>,
) -> anyhow::Result<(CrawlStats, usize)> {
    let mut write_error: Option<HarvestError> = None;

    let stats = crawler
        .crawl_streaming(|document| {
            if write_error.is_some() {
                return;
            }
            if let Err(e) = writer.write_document(&document) {
                tracing::error!("Failed to write document from {}: {}", document.source(), e);
                write_error = Some(e);
            }
        })
        .await?;

    if let Some(e) = write_error {
        return Err(e).context("Failed to write documents");
    }
    let written = writer.finish().context("Failed to flush documents")?;
    Ok((stats, written))
}
