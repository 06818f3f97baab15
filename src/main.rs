mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::sitemap::{self, ExtractArgs};
use crate::cmd::tickets;
use crate::config::AppConfig;
use crate::error::AppResult;

#[derive(Parser)]
#[command(
    name = "aviva",
    author,
    version,
    about = "Content pipeline helpers for the Aviva website"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create one Linear ticket per dental service under the parent issue.
    ServiceTickets,
    /// Extract one URL per ranked competitor from local sitemaps into a TSV file.
    ExtractUrls(ExtractArgs),
    /// Inspect CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage errors exit with 1; --help and --version are not errors.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_tracing();

    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = AppConfig::load()?;

    match cli.command {
        Commands::ServiceTickets => {
            tickets::run(config).await?;
            Ok(())
        }
        Commands::ExtractUrls(args) => {
            sitemap::run(config.extractor, args)?;
            Ok(())
        }
        Commands::Config(args) => config_cmd::run(&config, args.command),
    }
}
