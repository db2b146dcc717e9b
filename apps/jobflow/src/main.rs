use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobflow::cli::Cli;
use jobflow::config::Config;
use jobflow::filing::ApplicationAllocator;
use jobflow::llm_client::{self, LlmClient};
use jobflow::pipeline::Orchestrator;
use jobflow::search::serper::SerperClient;
use jobflow::search::PortalJobSource;
use jobflow::tailoring::LlmResumeTailor;

const EXIT_INVALID_INPUT: u8 = 1;
const EXIT_BACKEND: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration first; a missing credential is invalid input.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobflow v{}", env!("CARGO_PKG_VERSION"));

    // Initialize search client
    let search = match SerperClient::new(
        config.serper_api_key.clone(),
        config.serper_url.clone(),
        config.search_timeout,
    ) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build search client: {e}");
            return ExitCode::from(EXIT_BACKEND);
        }
    };

    // Initialize LLM client
    let llm = match LlmClient::new(
        config.gemini_api_key.clone(),
        config.gemini_url.clone(),
        config.generation_timeout,
    ) {
        Ok(client) => client.with_max_attempts(config.generation_max_attempts),
        Err(e) => {
            error!("Failed to build LLM client: {e}");
            return ExitCode::from(EXIT_BACKEND);
        }
    };
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let settings = cli.run_settings();
    let cancel = CancellationToken::new();
    let orchestrator = Orchestrator::new(
        Arc::new(PortalJobSource::new(search)),
        Arc::new(LlmResumeTailor::new(llm)),
        ApplicationAllocator::new(&settings.applications_dir),
        settings.ledger_path(),
        cli.run_options(&config),
    )
    .with_cancellation(cancel.clone());

    // Ctrl-C stops new external calls; in-flight ones finish and completed work is filed.
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight work before stopping");
            cancel.cancel();
        }
    });

    match orchestrator.run(&cli.run_params()).await {
        Ok(report) => {
            if report.used_fallback {
                warn!("Search returned no usable postings; the ledger holds the placeholder posting");
            }
            for skipped in &report.skipped {
                warn!("Skipped {}: {}", skipped.job.label(), skipped.reason);
            }
            info!(
                "Filed {} applications ({} postings found) into {}",
                report.records.len(),
                report.postings_found,
                report.ledger_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
