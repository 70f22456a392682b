//! # siteprofile CLI
//!
//! Command-line interface for the siteprofile pipeline.
//!
//! ## Subcommands
//!
//! - `serve`: Run the HTTP API
//! - `extract`: Crawl a site (or load saved pages) and extract its business profile
//! - `crawl`: Crawl a site and save the pages as JSON
//! - `schema`: Print the extraction contract
//!
//! Settings fall back to environment variables (`HOST`, `PORT`,
//! `GEMINI_API_KEY`, `GEMINI_MODEL`, `GEMINI_RPM`), and a `.env` file in the working
//! directory is loaded first.

mod telemetry;

use std::fmt::Write as _;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use siteprofile::aggregator::AggregationLimits;
use siteprofile::crawler::storage::{self, SavedCrawler};
use siteprofile::crawler::{Crawler, CrawlerConfig, SpiderCrawler};
use siteprofile::extraction::{DEFAULT_MODEL, ExtractionClient, GeminiSettings, shared_generator};
use siteprofile::pipeline::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES, Pipeline, ResultEnvelope, ScrapeRequest,
};
use siteprofile::schema::{BusinessProfile, ExtractionContract};
use siteprofile::server::{self, AppState};
use tracing::{info, instrument};

#[derive(Parser)]
#[command(author, version, about = "Crawl a business website and extract a structured profile with Gemini", long_about = None)]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    gemini: GeminiArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct GeminiArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    gemini_api_key: Option<String>,

    /// Gemini model used for extraction
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL, global = true)]
    gemini_model: String,

    /// Maximum Gemini requests per minute
    #[arg(long, env = "GEMINI_RPM", global = true)]
    gemini_rpm: Option<NonZeroU32>,
}

impl GeminiArgs {
    fn settings(&self) -> GeminiSettings {
        GeminiSettings::default()
            .with_api_key(self.gemini_api_key.clone())
            .with_model(self.gemini_model.clone())
            .with_requests_per_minute(self.gemini_rpm)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Extract a business profile from a website or a saved crawl
    Extract(ExtractArgs),

    /// Crawl a website and save the pages
    Crawl(CrawlArgs),

    /// Print the extraction instructions and response schema
    Schema,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    port: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// URL to crawl, or a JSON file written by `crawl`
    #[arg(required = true)]
    source: String,

    /// Maximum link depth
    #[arg(short = 'd', long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u32,

    /// Maximum number of pages to crawl
    #[arg(short = 'p', long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// URL to crawl
    #[arg(required = true)]
    url: String,

    /// Maximum link depth
    #[arg(short = 'd', long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u32,

    /// Maximum number of pages to crawl
    #[arg(short = 'p', long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: u32,

    /// Delay between requests in milliseconds
    #[arg(short, long, default_value = "250")]
    rate: u64,

    /// Save crawled pages to this file
    #[arg(short, long, default_value = "pages.json")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let _otel = telemetry::init_tracing_subscriber(cli.log_file.as_deref())?;

    match cli.command {
        Some(Commands::Serve(args)) => serve_command(args, &cli.gemini).await?,
        Some(Commands::Extract(args)) => extract_command(args, &cli.gemini).await?,
        Some(Commands::Crawl(args)) => crawl_command(args).await?,
        Some(Commands::Schema) => schema_command()?,
        None => Cli::command().print_help()?,
    }

    Ok(())
}

/// Build the pipeline around `crawler` and a generator shared for the process
fn build_pipeline(crawler: Arc<dyn Crawler>, gemini: &GeminiArgs) -> anyhow::Result<Pipeline> {
    let extraction = ExtractionClient::new(
        shared_generator(gemini.settings())?,
        ExtractionContract::current()?,
        AggregationLimits::default(),
    );
    Ok(Pipeline::new(crawler, extraction))
}

fn live_crawler() -> Arc<dyn Crawler> {
    Arc::new(SpiderCrawler::new(CrawlerConfig::default()))
}

#[instrument(skip(gemini))]
async fn serve_command(args: ServeArgs, gemini: &GeminiArgs) -> anyhow::Result<()> {
    let pipeline = build_pipeline(live_crawler(), gemini)?;
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;

    server::serve(addr, AppState::new(pipeline)).await?;
    Ok(())
}

#[instrument(skip(gemini))]
async fn extract_command(args: ExtractArgs, gemini: &GeminiArgs) -> anyhow::Result<()> {
    let (crawler, seed_url) =
        if args.source.starts_with("http://") || args.source.starts_with("https://") {
            (live_crawler(), args.source.clone())
        } else {
            saved_crawler(&args.source).await?
        };
    let pipeline = build_pipeline(crawler, gemini)?;
    let request = ScrapeRequest::new(&seed_url)
        .with_max_depth(args.max_depth)
        .with_max_pages(args.max_pages);

    let spinner = spinner(format!("Crawling and extracting {}...", args.source));
    let result = pipeline.run_guarded(&request).await;
    spinner.finish_and_clear();
    let envelope = result?;

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&envelope)?,
        OutputFormat::Text => render_text(&envelope),
    };

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, rendered).await?;
            println!("Saved result to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    if !envelope.success {
        anyhow::bail!(
            "{}",
            envelope.error.unwrap_or_else(|| "Extraction failed".to_string())
        );
    }
    Ok(())
}

/// Replay pages saved by `crawl` instead of crawling again
async fn saved_crawler(path: &str) -> anyhow::Result<(Arc<dyn Crawler>, String)> {
    let page_set = storage::load_pages(path)
        .await
        .with_context(|| format!("Failed to load pages from {}", path))?;
    let seed_url = page_set
        .seed()
        .map(str::to_string)
        .with_context(|| format!("{} contains no pages", path))?;
    info!("Loaded {} saved pages from {}", page_set.pages.len(), path);

    Ok((Arc::new(SavedCrawler::new(page_set)), seed_url))
}

#[instrument]
async fn crawl_command(args: CrawlArgs) -> anyhow::Result<()> {
    let request = ScrapeRequest::new(&args.url)
        .with_max_depth(args.max_depth)
        .with_max_pages(args.max_pages);
    request.validate()?;

    let config = CrawlerConfig::builder().rate_limit_ms(args.rate).build();
    let crawler = SpiderCrawler::new(config);

    let spinner = spinner(format!("Crawling {}...", args.url));
    let pages = crawler
        .crawl(&args.url, args.max_depth, args.max_pages)
        .await;
    spinner.finish_and_clear();
    let pages = pages?;

    println!("Crawled {} pages", pages.len());
    storage::save_pages(&args.output, Some(&args.url), &pages).await?;
    println!("Saved crawled content to {}", args.output.display());

    Ok(())
}

fn schema_command() -> anyhow::Result<()> {
    let contract = ExtractionContract::current()?;
    println!("Schema version: {}\n", contract.version);
    println!("Instructions:\n{}\n", contract.instructions);
    println!(
        "Response schema:\n{}",
        serde_json::to_string_pretty(&contract.schema)?
    );
    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} [{elapsed}] {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

fn render_text(envelope: &ResultEnvelope) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "URL: {}", envelope.url);
    let _ = writeln!(out, "Pages crawled: {}", envelope.pages_crawled);

    match (&envelope.data, &envelope.error) {
        (Some(profile), _) => render_profile(&mut out, profile),
        (None, Some(error)) => {
            let _ = writeln!(out, "Error: {}", error);
        }
        (None, None) => {}
    }
    out
}

fn render_profile(out: &mut String, profile: &BusinessProfile) {
    let list = |items: &[String]| {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.join("; ")
        }
    };

    let _ = writeln!(out, "\nName: {}", profile.name);
    let _ = writeln!(out, "Phones: {}", list(&profile.phones));
    let _ = writeln!(out, "Emails: {}", list(&profile.emails));
    let _ = writeln!(out, "Addresses: {}", list(&profile.addresses));

    let _ = writeln!(out, "\nHours:");
    for (day, hours) in profile.business_hours.days() {
        if hours.closed {
            let _ = writeln!(out, "  {:<10} closed", day);
            continue;
        }
        if hours.services.is_empty() {
            let _ = writeln!(out, "  {:<10} -", day);
            continue;
        }
        for service in &hours.services {
            let _ = writeln!(
                out,
                "  {:<10} {}: {}",
                day,
                service.service_name,
                service.display_hours()
            );
        }
    }

    let _ = writeln!(out, "\nServices: {}", list(&profile.services));
    if !profile.staff.is_empty() {
        let _ = writeln!(out, "\nStaff:");
        for member in &profile.staff {
            let _ = writeln!(out, "  {} ({})", member.name, member.role);
        }
    }
    if !profile.faqs.is_empty() {
        let _ = writeln!(out, "\nFAQs:");
        for faq in &profile.faqs {
            let _ = writeln!(out, "  Q: {}\n  A: {}", faq.question, faq.answer);
        }
    }
    let _ = writeln!(out, "\nPolicies: {}", list(&profile.policies));
    if !profile.additional_info.is_empty() {
        let _ = writeln!(out, "\nAdditional info: {}", profile.additional_info);
    }
}
