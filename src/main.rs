//! fedsearch CLI - federated web search from the command line.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use fedsearch::{AggregateResponse, ResultCategory, Search, SearchConfig, SearchQuery, SourceKind};

const SNIPPET_PREVIEW_CHARS: usize = 150;

/// fedsearch - query several web search engines at once
#[derive(Parser)]
#[command(name = "fedsearch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search across engines
    Search(SearchArgs),

    /// List available search engines
    Engines,
}

#[derive(Parser)]
struct SearchArgs {
    /// Search query
    query: String,

    /// Search engines to use (comma-separated)
    /// Available: google, bing, duckduckgo (ddg), yahoo, brave
    #[arg(short, long, value_delimiter = ',')]
    engines: Option<Vec<String>>,

    /// Result page to request from each engine
    #[arg(short, long, default_value = "1")]
    page: u32,

    /// Per-engine timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Maximum number of results to display
    #[arg(short, long, default_value = "10")]
    limit: usize,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Skip the extractive summary
    #[arg(long)]
    no_summary: bool,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Compact single-line output
    Compact,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Search(args) => run_search(args).await,
        Commands::Engines => list_engines(),
    }
}

fn list_engines() -> Result<()> {
    println!("Available search engines:\n");
    for kind in SourceKind::ALL {
        let description = match kind {
            SourceKind::Google => "Google Search",
            SourceKind::Bing => "Microsoft Bing",
            SourceKind::DuckDuckGo => "DuckDuckGo HTML endpoint (alias: ddg)",
            SourceKind::Yahoo => "Yahoo Search",
            SourceKind::Brave => "Brave Search",
        };
        println!("    {:<11} - {}", kind.id(), description);
    }
    println!();
    println!("Usage: fedsearch search \"query\" -e google,ddg,brave");
    Ok(())
}

fn load_config(args: &SearchArgs) -> Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::from_file(path)?,
        None => SearchConfig::default(),
    };
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if args.no_summary {
        config.summary = false;
    }
    config.cache_capacity = 0;
    config.validate()?;
    Ok(config)
}

async fn run_search(args: SearchArgs) -> Result<()> {
    if args.query.trim().is_empty() {
        anyhow::bail!("Query cannot be empty");
    }

    let config = load_config(&args)?;
    let search = Search::from_config(&config)?;

    let query = SearchQuery::new(&args.query)
        .with_page(args.page)
        .with_engines(args.engines.clone().unwrap_or_default());
    let response = search.search(query).await?;

    match args.format {
        OutputFormat::Text => print_text(&response, args.limit),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Compact => {
            for result in response.items().iter().take(args.limit) {
                println!("{}\t{}", result.title, result.link);
            }
        }
    }

    Ok(())
}

fn print_text(response: &AggregateResponse, limit: usize) {
    println!(
        "\nSearch results for \"{}\" ({} results in {:.2}s):\n",
        response.query, response.count, response.elapsed_seconds
    );

    if let Some(summary) = &response.summary {
        println!("Summary: {}\n", summary);
    }

    for (i, result) in response.items().iter().take(limit).enumerate() {
        let tag = match result.category() {
            ResultCategory::News => " [news]",
            ResultCategory::Web => "",
        };
        println!("{}. {}{}", i + 1, result.title, tag);
        println!("   URL: {}", result.link);
        if !result.snippet.is_empty() {
            let snippet = if result.snippet.chars().count() > SNIPPET_PREVIEW_CHARS {
                let preview: String = result.snippet.chars().take(SNIPPET_PREVIEW_CHARS).collect();
                format!("{}...", preview)
            } else {
                result.snippet.clone()
            };
            println!("   {}", snippet);
        }
        println!("   Source: {}", result.source);
        println!();
    }

    println!("Sources:");
    for (source, status) in &response.sources.status {
        println!("   {:<11} {:?}", source, status);
    }
}
