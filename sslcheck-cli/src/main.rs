use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sslcheck")]
#[command(about = "SSL certificate checker - query certificate details for any domain")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (human or json)
    #[arg(short, long, default_value = "human")]
    format: String,

    /// Emit compact single-line JSON (only meaningful with --format json)
    #[arg(long)]
    compact: bool,

    /// API key for the certificate checker service
    #[arg(short = 'k', long, env = "SSLCHECK_API_KEY")]
    api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Bypass the result cache and always hit the API
    #[arg(long)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the SSL certificate of a domain
    Check {
        /// Domain name to check
        domain: String,
    },
    /// Check certificates for a list of domains from a file
    Bulk {
        /// File containing domains: one per line, # for comments, or CSV (uses first column)
        file: String,
        /// Maximum concurrent requests
        #[arg(short, long, default_value_t = 5)]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let output_format: sslcheck_core::OutputFormat = cli.format.parse().unwrap_or_default();
    // The same formatter serves both subcommands, so `bulk --format json
    // --compact` emits the result array as one line as well.
    let formatter = sslcheck_core::output::get_formatter(output_format, cli.compact);

    let mut client =
        sslcheck_core::CheckClient::new().with_timeout(Duration::from_secs(cli.timeout));
    if let Some(key) = cli.api_key {
        client = client.with_api_key(key);
    }
    if cli.no_cache {
        client = client.without_cache();
    }

    match cli.command {
        Commands::Check { domain } => match client.check_domain(&domain).await {
            Ok(report) => {
                println!("{}", formatter.format_report(&report));
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".bright_red(), e);
                std::process::exit(1);
            }
        },
        Commands::Bulk { file, concurrency } => {
            let content = std::fs::read_to_string(&file)?;
            let domains = sslcheck_core::bulk::parse_domains_from_file(&content);

            if domains.is_empty() {
                eprintln!(
                    "{} No valid domains found in file. Expected format: one domain per line, # for comments, or CSV (first column)",
                    "Error:".bright_red()
                );
                std::process::exit(1);
            }

            let executor =
                sslcheck_core::BulkExecutor::new(client).with_concurrency(concurrency);
            let results = executor.execute(domains, None).await;

            println!("{}", formatter.format_bulk(&results));

            if results.iter().any(|r| !r.success) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
