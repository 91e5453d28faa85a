use anyhow::Context;
use clap::{Parser, Subcommand};
use hotwords_core::{AppConfig, CoreError, ErrorReporter};
use keyword_engine::KeywordAggregator;
use reddit_client::{ListingClient, Paginator};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod commands;

/// Keyword frequency over a subreddit's hot posts
#[derive(Parser)]
#[command(name = "hotwords")]
#[command(about = "Count keywords in a subreddit's hot post titles", long_about = None)]
struct Cli {
    /// Enable verbose logging on stderr (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true, env = "HOTWORDS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the subscriber count (0 if the subreddit cannot be read)
    Subscribers { subreddit: String },
    /// Print the titles of the first hot page
    TopTen { subreddit: String },
    /// Print every hot title across all pages
    Titles { subreddit: String },
    /// Print `keyword: count` lines for keywords found in hot titles
    Count {
        subreddit: String,
        /// Keywords, separated by spaces or given as separate arguments
        #[arg(required = true)]
        keywords: Vec<String>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let reporter = ErrorReporter::new();
    let config = AppConfig::load(cli.config.as_deref())
        .map_err(|e| {
            let e = CoreError::Config(e);
            reporter.report_error(&e);
            e
        })
        .context("failed to load configuration")?;
    let client = ListingClient::from_config(&config.api)
        .map_err(|e| {
            reporter.report_error(&e);
            e
        })
        .context("failed to build HTTP client")?;
    let aggregator = KeywordAggregator::new(Paginator::new(client, &config.pagination));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current page");
            on_interrupt.cancel();
        }
    });

    let paginator = aggregator.paginator();
    let lines = match &cli.command {
        Commands::Subscribers { subreddit } => {
            commands::subscribers(paginator.client(), subreddit).await
        }
        Commands::TopTen { subreddit } => {
            commands::top_titles(paginator, subreddit, config.pagination.top_limit).await
        }
        Commands::Titles { subreddit } => {
            commands::all_titles(paginator, subreddit, &cancel).await
        }
        Commands::Count {
            subreddit,
            keywords,
        } => commands::keyword_report(&aggregator, subreddit, keywords, &cancel).await,
    };

    for line in lines {
        println!("{}", line);
    }

    match paginator.client().export_metrics().await {
        Ok(metrics) => tracing::debug!("Request metrics:\n{}", metrics),
        Err(e) => tracing::warn!("Could not export request metrics: {}", e),
    }
    Ok(())
}
