mod cli;
mod output;
mod pipeline;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use llm_interface::ClaudeProvider;
use pipeline::{Pipeline, RunOutcome};
use seo_client::DataForSeoClient;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use trendscout_core::{AppConfig, ErrorExt, ErrorReporter};
use twitter_client::{SearchQuery, TwitterApiClient};

const WORKSPACE_CRATES: [&str; 5] = [
    "trendscout",
    "trendscout_core",
    "twitter_client",
    "llm_interface",
    "seo_client",
];

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = WORKSPACE_CRATES
            .iter()
            .map(|name| format!("{name}={level}"))
            .collect();
        EnvFilter::new(directives.join(","))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_logging(cli.verbose);

    tracing::info!("Starting trendscout");

    let mut config = AppConfig::load(cli.config.as_deref()).map_err(|e| {
        eprintln!("❌ {}", e.user_friendly_message());
        e
    })?;
    if let Some(dir) = cli.output_dir {
        config.report_dir = dir;
    }

    let search = TwitterApiClient::new(&config).context("Failed to create search client")?;
    let llm = ClaudeProvider::new(&config).context("Failed to create Claude client")?;
    let keyword_metrics =
        DataForSeoClient::from_config(&config).context("Failed to create DataForSEO client")?;

    output::print_banner(&cli.keyword, cli.likes);

    let pipeline = Pipeline::new(
        &search,
        &llm,
        keyword_metrics.as_ref(),
        config.report_dir.clone(),
    );

    match pipeline.run(&SearchQuery::new(cli.keyword, cli.likes)).await {
        Ok(RunOutcome::Saved { report, path }) => {
            output::print_summary(&report, &path);
            Ok(ExitCode::SUCCESS)
        }
        Ok(RunOutcome::NoPosts) => {
            println!("❌ No tweets fetched. Exiting.");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            ErrorReporter::new().report_error(&e);
            println!("❌ Error saving report: {}", e.user_friendly_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
